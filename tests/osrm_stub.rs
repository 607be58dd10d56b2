//! OSRM client tests against a local stub server.
//!
//! The stub answers exactly one request with a canned body, so the live path
//! and its fallback can be exercised without Docker.

mod fixtures;

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use visit_planner::config::PlannerConfig;
use visit_planner::haversine::HaversineMatrix;
use visit_planner::matrix::{GeoMatrixProvider, MatrixSource};
use visit_planner::osrm::{OsrmClient, OsrmConfig};
use visit_planner::pipeline::{PlanOutcome, Planner};
use visit_planner::traits::DistanceMatrixProvider;

use fixtures::{CENTRE, stops_for};

/// Serves one HTTP response and reports the request line it received.
fn serve_once(status: &'static str, body: String) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).expect("read header");
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = tx.send(request_line.trim_end().to_string());
    });

    (base_url, rx)
}

fn client(base_url: &str) -> OsrmClient {
    OsrmClient::new(OsrmConfig {
        base_url: base_url.to_string(),
        profile: "driving".to_string(),
        timeout_secs: 5,
    })
    .expect("build OSRM client")
}

fn table_body(durations: &[[f64; 3]; 3], distances: &[[f64; 3]; 3]) -> String {
    serde_json::json!({
        "code": "Ok",
        "durations": durations,
        "distances": distances,
    })
    .to_string()
}

#[test]
fn live_table_is_parsed_into_both_matrices() {
    let durations = [[0.0, 120.0, 300.0], [130.0, 0.0, 200.0], [310.0, 190.0, 0.0]];
    let distances = [[0.0, 900.0, 2500.0], [950.0, 0.0, 1600.0], [2400.0, 1500.0, 0.0]];
    let (base_url, requests) = serve_once("200 OK", table_body(&durations, &distances));

    let locations: Vec<_> = CENTRE[..3].iter().map(|l| l.coords()).collect();
    let matrices = client(&base_url).matrix_for(&locations).expect("live matrix");

    assert_eq!(matrices.source, MatrixSource::Routed);
    assert_eq!(matrices.duration(0, 1), 120.0);
    assert_eq!(matrices.duration(1, 0), 130.0);
    assert_eq!(matrices.distance(2, 0), 2400.0);

    let request = requests.recv().expect("request seen");
    assert!(request.starts_with("GET /table/v1/driving/-46.633300,-23.550500;"));
    assert!(request.contains("annotations=duration,distance"));
}

#[test]
fn error_status_falls_back_to_estimate() {
    let (base_url, _requests) = serve_once("503 Service Unavailable", "{}".to_string());
    let provider = GeoMatrixProvider::new(
        Some(Box::new(client(&base_url))),
        Box::new(HaversineMatrix::default()),
    );

    let locations: Vec<_> = CENTRE[..3].iter().map(|l| l.coords()).collect();
    let matrices = provider.matrices(&locations);

    assert_eq!(matrices.source, MatrixSource::Estimated);
    assert_eq!(matrices.size(), 3);
    for i in 0..3 {
        assert_eq!(matrices.duration(i, i), 0.0);
        for j in 0..3 {
            assert!((matrices.distance(i, j) - matrices.distance(j, i)).abs() < 1e-6);
        }
    }
}

#[test]
fn malformed_payload_falls_back_to_estimate() {
    let (base_url, _requests) = serve_once("200 OK", r#"{"code":"Ok","durations":[[0]]}"#.to_string());
    let provider = GeoMatrixProvider::new(
        Some(Box::new(client(&base_url))),
        Box::new(HaversineMatrix::default()),
    );

    let locations: Vec<_> = CENTRE[..2].iter().map(|l| l.coords()).collect();
    let matrices = provider.matrices(&locations);

    assert_eq!(matrices.source, MatrixSource::Estimated);
    assert_eq!(matrices.size(), 2);
}

#[test]
fn planner_uses_routed_costs_when_available() {
    // Directional costs: going 0 -> 2 -> 1 is cheapest.
    let durations = [[0.0, 500.0, 60.0], [500.0, 0.0, 500.0], [60.0, 90.0, 0.0]];
    let distances = [[0.0, 5000.0, 600.0], [5000.0, 0.0, 5000.0], [600.0, 1200.0, 0.0]];
    let (base_url, _requests) = serve_once("200 OK", table_body(&durations, &distances));

    let config = PlannerConfig {
        osrm: Some(OsrmConfig::new(base_url)),
        ..PlannerConfig::default()
    };
    let planner = Planner::new(config);
    let stops = stops_for("ana", &CENTRE[..3]);

    let plan = match planner.plan("ana", &stops).expect("planning succeeds") {
        PlanOutcome::Planned(plan) => plan,
        PlanOutcome::Empty { .. } => panic!("expected a route"),
    };

    assert_eq!(plan.matrix_source, MatrixSource::Routed);
    assert_eq!(plan.tour.order, vec![0, 2, 1]);
    assert_eq!(plan.tour.hop_durations, vec![0.0, 60.0, 90.0]);
    assert_eq!(plan.visits[1].travel_minutes, 1.0);
    assert_eq!(plan.visits[2].travel_km, 1.2);
}
