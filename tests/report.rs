use covidcurves::config::EventDate;
use covidcurves::process::CorrectionTable;
use covidcurves::{ChartView, Config, PipelineError, Reporter};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

const FIXTURE: &str = include_str!("fixtures/jhu_confirmed.csv");

/// Answer every connection with the same HTTP response.
async fn serve(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = sock.write_all(resp.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    });
    format!("http://{}/{{metric}}.csv", addr)
}

fn config(source: String) -> Config {
    Config {
        source,
        timeout_secs: 5,
        entities: vec!["France".into(), "Italy".into(), "Spain".into()],
        events: BTreeMap::from([(
            "France".to_string(),
            EventDate::from(NaiveDate::from_ymd_opt(2020, 1, 27).unwrap()),
        )]),
        corrections: CorrectionTable::new()
            .with("confirmed", vec![])
            .with("deaths", vec![]),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_chart_from_served_csv() {
    let source = serve("200 OK", FIXTURE).await;
    let reporter = Reporter::new(config(source)).unwrap();

    let view: ChartView = reporter.chart("confirmed").await.unwrap();
    assert_eq!(view.metric, "confirmed");
    assert_eq!(view.cumulative.series.len(), 3);

    let france = &view.cumulative.series[0];
    assert_eq!(france.entity, "France");
    assert_eq!(france.y, vec![120.0, 200.0, 180.0]);
    // day zero is 1/24/20
    assert_eq!(france.event_x, Some(3.0));
    assert_eq!(view.daily.series[0].y, vec![120.0, 80.0, 0.0]);
    assert_eq!(view.event_legend, vec!["France - lockdown".to_string()]);
}

#[tokio::test]
async fn test_upstream_error_status_is_fetch_failure() {
    let source = serve("503 Service Unavailable", "").await;
    let reporter = Reporter::new(config(source)).unwrap();
    let err = reporter.dataset("deaths").await.unwrap_err();
    assert!(matches!(err, PipelineError::FetchFailure { .. }));
}

#[tokio::test]
async fn test_garbage_body_is_malformed_input() {
    let source = serve("200 OK", "Province,Country,Lat,Long,1/22/20\n,France,0,0,lots\n").await;
    let reporter = Reporter::new(config(source)).unwrap();
    let err = reporter.dataset("confirmed").await.unwrap_err();
    assert!(matches!(err, PipelineError::MalformedInput(_)));
}

#[tokio::test]
async fn test_unconfigured_metric() {
    let reporter = Reporter::new(config("http://127.0.0.1:9/{metric}.csv".into())).unwrap();
    let err = reporter.chart("recovered").await.unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedMetric(_)));
}
