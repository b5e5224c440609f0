//! Integration tests for the decision service round trip
//!
//! The HTTP tests run a throwaway server on a local port that answers
//! every connection with one canned response.

use brains::actor::{ActorRequest, ActorSpec, ActorView};
use brains::core::config::ArenaConfig;
use brains::core::error::{BrainsError, Result};
use brains::core::types::{ActorId, ActorKind, ActorStatus, Point, Step};
use brains::decision::{gather_decisions, Decision, DecisionRequest, DecisionService, HttpDecisionClient};
use brains::persistence::MemoryStore;
use brains::simulation::run_simulation_tick;
use brains::world::World;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Answers every request the same way after a fixed delay
struct Scripted {
    delay: Duration,
    decision: Decision,
}

impl DecisionService for Scripted {
    fn decide(&self, _request: DecisionRequest) -> impl Future<Output = Result<Decision>> + Send {
        let delay = self.delay;
        let decision = self.decision.clone();
        async move {
            tokio::time::sleep(delay).await;
            Ok(decision)
        }
    }
}

fn request_for(tick: u64) -> DecisionRequest {
    DecisionRequest {
        tick,
        actor: ActorView {
            id: ActorId::new(),
            kind: ActorKind::Human,
            x: 10,
            y: 10,
            heading: 0.0,
            health: 100,
            status: ActorStatus::Alive,
        },
        visible: Vec::new(),
    }
}

/// Read one HTTP request: headers, then `content-length` bytes of body
async fn read_request(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&raw);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= end + 4 + length {
                break;
            }
        }
    }
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Start a one-response server and return its URL
async fn serve(status: &'static str, body: &'static str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let request = read_request(&mut socket).await.unwrap_or_default();
                assert!(request.starts_with("POST "), "unexpected request: {}", request);

                tokio::time::sleep(delay).await;
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_http_client_parses_move() {
    let url = serve("200 OK", r#"{"action":"move","dx":1,"dy":-1}"#, Duration::ZERO).await;
    let client = HttpDecisionClient::new(url, Duration::from_secs(2)).unwrap();

    let decision = client.decide(request_for(0)).await.unwrap();

    assert_eq!(decision, Decision::Move { dx: 1, dy: -1 });
    assert_eq!(
        decision.into_request().unwrap(),
        ActorRequest::Move(Step::new(1, -1).unwrap())
    );
}

#[tokio::test]
async fn test_http_client_reports_server_error() {
    let url = serve("500 Internal Server Error", r#"{"error":"boom"}"#, Duration::ZERO).await;
    let client = HttpDecisionClient::new(url, Duration::from_secs(2)).unwrap();

    let result = client.decide(request_for(0)).await;

    assert!(matches!(result, Err(BrainsError::Decision(_))));
}

#[tokio::test]
async fn test_malformed_answer_rests_actor() {
    let url = serve("200 OK", r#"{"action":"fly"}"#, Duration::ZERO).await;
    let client = Arc::new(HttpDecisionClient::new(url, Duration::from_secs(2)).unwrap());
    let request = request_for(0);
    let actor = request.actor.id;

    let decisions = gather_decisions(&client, vec![request], Duration::from_secs(2)).await;

    assert_eq!(decisions.get(actor), Some(ActorRequest::NoOp));
    assert_eq!(decisions.failures(), 1);
}

#[tokio::test]
async fn test_oversized_step_rests_actor() {
    let url = serve("200 OK", r#"{"action":"move","dx":3,"dy":0}"#, Duration::ZERO).await;
    let client = Arc::new(HttpDecisionClient::new(url, Duration::from_secs(2)).unwrap());
    let request = request_for(0);
    let actor = request.actor.id;

    let decisions = gather_decisions(&client, vec![request], Duration::from_secs(2)).await;

    assert_eq!(decisions.get(actor), Some(ActorRequest::NoOp));
    assert_eq!(decisions.failures(), 1);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let url = serve("200 OK", r#"{"action":"noop"}"#, Duration::from_secs(5)).await;
    let client = Arc::new(HttpDecisionClient::new(url, Duration::from_secs(10)).unwrap());
    let request = request_for(0);
    let actor = request.actor.id;

    let started = Instant::now();
    let decisions = gather_decisions(&client, vec![request], Duration::from_millis(100)).await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(decisions.get(actor), Some(ActorRequest::NoOp));
    assert_eq!(decisions.failures(), 1);
}

#[tokio::test]
async fn test_unreachable_service_rests_actor() {
    // Grab a free port, then close it so nothing is listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Arc::new(HttpDecisionClient::new(format!("http://{}", addr), Duration::from_secs(1)).unwrap());
    let request = request_for(0);
    let actor = request.actor.id;

    let decisions = gather_decisions(&client, vec![request], Duration::from_secs(1)).await;

    assert_eq!(decisions.get(actor), Some(ActorRequest::NoOp));
    assert_eq!(decisions.failures(), 1);
}

#[tokio::test]
async fn test_calls_run_concurrently() {
    let service = Arc::new(Scripted {
        delay: Duration::from_millis(200),
        decision: Decision::Turn { heading: 90.0 },
    });
    let requests: Vec<_> = (0..8).map(request_for).collect();
    let ids: Vec<_> = requests.iter().map(|r| r.actor.id).collect();

    let started = Instant::now();
    let decisions = gather_decisions(&service, requests, Duration::from_secs(2)).await;
    let elapsed = started.elapsed();

    // Sequential calls would take 1.6s
    assert!(elapsed < Duration::from_millis(1000), "took {:?}", elapsed);
    assert_eq!(decisions.len(), 8);
    assert_eq!(decisions.failures(), 0);
    for id in ids {
        assert_eq!(decisions.get(id), Some(ActorRequest::Turn(90.0)));
    }
}

#[tokio::test]
async fn test_slow_human_rests_while_zombies_act() {
    let mut config = ArenaConfig::new();
    config.world.seed = Some(4);
    let mut world = World::new(config);
    let human = world
        .add(ActorSpec::human("Robot").at(Point::new(100, 100)).facing(45.0))
        .unwrap();
    let zombie = world.add(ActorSpec::zombie().at(Point::new(300, 300))).unwrap();

    let service = Arc::new(Scripted {
        delay: Duration::from_secs(5),
        decision: Decision::Move { dx: 1, dy: 0 },
    });
    let mut store = MemoryStore::new();

    let summary = run_simulation_tick(&mut world, &mut store, &service, Duration::from_millis(50)).await;

    assert_eq!(summary.decision_failures, 1);
    assert_eq!(summary.saved, 2);
    assert_eq!(world.current_tick, 1);

    let robot = world.actor(human).unwrap();
    assert_eq!(robot.position(), Point::new(100, 100));
    assert_eq!(robot.heading(), 45.0);

    // The zombie still took its turn
    assert_eq!(summary.moved + summary.turned, 1);
    assert!(world.actor(zombie).unwrap().target().is_some());
}

#[tokio::test]
async fn test_remote_attack_lands() {
    let mut config = ArenaConfig::new();
    config.world.seed = Some(8);
    let mut world = World::new(config);
    let human = world.add(ActorSpec::human("Robot").at(Point::new(10, 10))).unwrap();
    let zombie = world.add(ActorSpec::zombie().at(Point::new(10, 150))).unwrap();

    let service = Arc::new(Scripted {
        delay: Duration::ZERO,
        decision: Decision::Attack { target: zombie },
    });
    let mut store = MemoryStore::new();

    let summary = run_simulation_tick(&mut world, &mut store, &service, Duration::from_secs(1)).await;

    assert_eq!(summary.hits, 1);
    let damage = world.config().human.damage;
    assert_eq!(world.actor(zombie).unwrap().health(), 100 - damage);
    assert!(world.actor(human).unwrap().is_alive());
}

#[tokio::test]
async fn test_humans_see_tick_start_state() {
    let mut config = ArenaConfig::new();
    config.world.seed = Some(2);
    let mut world = World::new(config);
    world.add(ActorSpec::zombie().at(Point::new(10, 10))).unwrap();
    world.add(ActorSpec::human("Robot").at(Point::new(10, 60))).unwrap();

    let requests = world.decision_requests();

    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.tick, 0);
    assert_eq!(request.visible.len(), 1);
    assert_eq!(request.visible[0].kind, ActorKind::Zombie);

    let json = serde_json::to_value(request).unwrap();
    assert_eq!(json["actor"]["kind"], "human");
    assert_eq!(json["visible"][0]["x"], 10);
}
