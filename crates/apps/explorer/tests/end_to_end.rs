use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use explorer::{drive, ExplorerSession, HttpTransport, MapSlot, QueryTransport, ViewEvent};
use foundation::bounds::{GeoBounds, LatLng};
use foundation::time::YearWindow;
use layers::surface::RecordingSurface;
use layers::symbology::color_of;
use pretty_assertions::assert_eq;
use protocol::QueryParams;
use relay::{AppState, RelayConfig};
use tokio::sync::mpsc;

const ROWS: &str = r#"{
  "head": {"vars": ["item", "itemLabel", "coord", "when", "article"]},
  "results": {"bindings": [
    {"item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q10"},
     "itemLabel": {"type": "literal", "value": "Madrid event"},
     "coord": {"type": "literal", "value": "Point(-3.7 40.4)"},
     "when": {"type": "literal", "value": "1936-07-17T00:00:00Z"},
     "article": {"type": "uri", "value": "https://en.wikipedia.org/wiki/Madrid"}},
    {"item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q20"},
     "coord": {"type": "literal", "value": "Point(2.35 41.38)"}},
    {"item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q30"},
     "itemLabel": {"type": "literal", "value": "Nowhere"}}
  ]}
}"#;

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn spawn_stack(status: StatusCode, body: &'static str) -> SocketAddr {
    let upstream = spawn(Router::new().route(
        "/sparql",
        post(move || async move { (status, body).into_response() }),
    ))
    .await;
    let config = RelayConfig {
        upstream_url: format!("http://{upstream}/sparql"),
        ..RelayConfig::default()
    };
    spawn(relay::router(AppState::new(&config).expect("client"))).await
}

fn spain() -> GeoBounds {
    GeoBounds::new(-10.0, 35.0, 5.0, 45.0)
}

#[tokio::test]
async fn transport_returns_relayed_rows() {
    let relay = spawn_stack(StatusCode::OK, ROWS).await;
    let transport = HttpTransport::new(format!("http://{relay}"));

    let rows = transport
        .query(QueryParams::from_view(spain(), YearWindow::new(1900, 2000)))
        .await
        .expect("rows");
    let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "http://www.wikidata.org/entity/Q10",
            "http://www.wikidata.org/entity/Q20",
        ]
    );
}

#[tokio::test]
async fn transport_surfaces_upstream_failures() {
    let relay = spawn_stack(StatusCode::SERVICE_UNAVAILABLE, "down").await;
    let transport = HttpTransport::new(format!("http://{relay}"));

    let err = transport
        .query(QueryParams::from_view(spain(), YearWindow::default()))
        .await
        .expect_err("upstream is down");
    assert_eq!(err.status, Some(503));
    assert!(err.to_string().contains("503"), "{err}");
}

#[tokio::test]
async fn map_shows_markers_for_the_settled_view() {
    let relay = spawn_stack(StatusCode::OK, ROWS).await;
    let transport = HttpTransport::new(format!("http://{relay}"));
    let mut slot = MapSlot::new();
    slot.mount_with(RecordingSurface::new).expect("mount");

    let (tx, rx) = mpsc::channel(4);
    tx.send(ViewEvent::BoundsSettled(spain())).await.expect("send");
    drop(tx);

    let session = ExplorerSession::with_debounce(YearWindow::new(1900, 2000), 20);
    let session = drive(session, &mut slot, &transport, rx).await;
    assert_eq!(session.last_error(), None);

    let surface = slot.get().expect("mounted");
    let mut placed: Vec<_> = surface
        .markers()
        .map(|(_, m)| (m.popup.entity_url.clone(), m.position, m.style.color))
        .collect();
    placed.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        placed,
        vec![
            (
                "http://www.wikidata.org/entity/Q10".to_string(),
                LatLng::new(40.4, -3.7),
                color_of("http://www.wikidata.org/entity/Q10"),
            ),
            (
                "http://www.wikidata.org/entity/Q20".to_string(),
                LatLng::new(41.38, 2.35),
                color_of("http://www.wikidata.org/entity/Q20"),
            ),
        ]
    );

    let madrid = surface
        .markers()
        .map(|(_, m)| m)
        .find(|m| m.tooltip == "Madrid event")
        .expect("labelled marker");
    assert_eq!(madrid.popup.date.as_deref(), Some("1936-07-17"));
    assert_eq!(
        madrid.popup.article_url.as_deref(),
        Some("https://en.wikipedia.org/wiki/Madrid")
    );

    assert!(slot.unmount());
}
