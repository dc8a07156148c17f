//! End-to-end evaluation with in-process backends
//!
//! These tests drive corpus loading, dispatch, scoring, aggregation and the
//! TSV report together, using fake backends in place of the HTTP adapters.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sentiment_compare::{
    analysis::EvaluationReport,
    backends::{BackendError, BackendRegistry, BackendResult, SentimentBackend, SharedBackend},
    corpus::{load_corpus_from_string, Corpus, Label},
    reporting::{DocumentRow, TsvWriter},
    runner::Evaluator,
};

const CORPUS: &str = "Great phone\t+\n\
                      Terrible service\t-\n\
                      It is a phone\t0\n\
                      buy followers now\tX\n";

/// Reads the gold answer off the text
struct Oracle;

#[async_trait]
impl SentimentBackend for Oracle {
    fn name(&self) -> &str {
        "oracle"
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        Ok(if text.contains("Great") {
            Label::Positive
        } else if text.contains("Terrible") {
            Label::Negative
        } else {
            Label::Neutral
        })
    }
}

/// Always answers the same label
struct Fixed(&'static str, Label);

#[async_trait]
impl SentimentBackend for Fixed {
    fn name(&self) -> &str {
        self.0
    }

    async fn classify(&self, _text: &str) -> BackendResult<Label> {
        Ok(self.1)
    }
}

/// Fails every call
struct Down;

#[async_trait]
impl SentimentBackend for Down {
    fn name(&self) -> &str {
        "down"
    }

    async fn classify(&self, _text: &str) -> BackendResult<Label> {
        Err(BackendError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

/// Panics on negative documents, answers Negative otherwise
struct Crash;

#[async_trait]
impl SentimentBackend for Crash {
    fn name(&self) -> &str {
        "crash"
    }

    async fn classify(&self, text: &str) -> BackendResult<Label> {
        if text.contains("Terrible") {
            panic!("adapter bug");
        }
        Ok(Label::Negative)
    }
}

/// Answers Neutral after a delay
struct Slow;

#[async_trait]
impl SentimentBackend for Slow {
    fn name(&self) -> &str {
        "slow"
    }

    async fn classify(&self, _text: &str) -> BackendResult<Label> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(Label::Neutral)
    }
}

fn corpus() -> Corpus {
    load_corpus_from_string(CORPUS).unwrap()
}

async fn evaluate(backends: Vec<SharedBackend>) -> (EvaluationReport, Vec<DocumentRow>) {
    let evaluator = Evaluator::new(BackendRegistry::new(backends).unwrap());
    let mut rows: Vec<DocumentRow> = Vec::new();
    let report = evaluator.evaluate(&corpus(), &mut rows).await.unwrap();
    (report, rows)
}

fn all_backends() -> Vec<SharedBackend> {
    vec![
        Arc::new(Oracle),
        Arc::new(Fixed("optimist", Label::Positive)),
        Arc::new(Down),
        Arc::new(Crash),
        Arc::new(Slow),
    ]
}

#[tokio::test]
async fn test_full_run_scores() {
    let (report, _) = evaluate(all_backends()).await;

    assert_eq!(report.total_documents, 3);
    // two polar documents and one neutral
    assert_eq!(report.max_weighted_errors, 5);

    let oracle = report.get("oracle").unwrap();
    assert_eq!(oracle.hits, 3);
    assert_eq!(oracle.weighted_errors, 0);
    assert_eq!(oracle.accuracy, 1.0);
    assert_eq!(oracle.error_rate, 0.0);

    // hit on positive, reversal on negative, one-step miss on neutral
    let optimist = report.get("optimist").unwrap();
    assert_eq!(optimist.hits, 1);
    assert_eq!(optimist.weighted_errors, 3);
    assert!((optimist.accuracy - 1.0 / 3.0).abs() < 1e-12);
    assert!((optimist.error_rate - 0.6).abs() < 1e-12);

    let down = report.get("down").unwrap();
    assert_eq!(down.accuracy, 0.0);
    assert_eq!(down.error_rate, 0.0);
    assert_eq!(down.skipped, 3);

    // the panicking document is skipped, the rest are scored
    let crash = report.get("crash").unwrap();
    assert_eq!(crash.hits, 0);
    assert_eq!(crash.weighted_errors, 3);
    assert_eq!(crash.skipped, 1);

    let slow = report.get("slow").unwrap();
    assert_eq!(slow.hits, 1);
    assert_eq!(slow.weighted_errors, 2);

    for score in &report.scores {
        assert!((0.0..=1.0).contains(&score.error_rate), "{}", score.backend);
        assert!((0.0..=1.0).contains(&score.accuracy), "{}", score.backend);
    }
}

#[tokio::test]
async fn test_failures_do_not_leak_into_other_backends() {
    let healthy = || -> Vec<SharedBackend> {
        vec![Arc::new(Oracle), Arc::new(Fixed("optimist", Label::Positive))]
    };

    let (baseline, baseline_rows) = evaluate(healthy()).await;

    let mut faulty = healthy();
    faulty.push(Arc::new(Down));
    faulty.push(Arc::new(Crash));
    let (with_faults, faulty_rows) = evaluate(faulty).await;

    for name in ["oracle", "optimist"] {
        assert_eq!(baseline.get(name), with_faults.get(name));
        for (a, b) in baseline_rows.iter().zip(&faulty_rows) {
            assert_eq!(a.outputs[name], b.outputs[name]);
        }
    }
}

#[tokio::test]
async fn test_one_row_per_document_with_error_marker() {
    let (_, rows) = evaluate(all_backends()).await;

    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter().map(|r| r.document_id).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    for row in &rows {
        assert_eq!(
            row.outputs.keys().collect::<Vec<_>>(),
            vec!["oracle", "optimist", "down", "crash", "slow"]
        );
        assert_eq!(row.outputs["down"], "Error");
    }

    assert_eq!(rows[1].gold, Label::Negative);
    assert_eq!(rows[1].outputs["crash"], "Error");
    assert_eq!(rows[1].outputs["oracle"], "-");
}

#[tokio::test]
async fn test_tsv_report() {
    let evaluator = Evaluator::new(BackendRegistry::new(all_backends()).unwrap());
    let mut sink = TsvWriter::new(Vec::new(), &evaluator.backend_names()).unwrap();

    evaluator.evaluate(&corpus(), &mut sink).await.unwrap();

    let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "doc_id\ttext\tgold standard\toracle\toptimist\tdown\tcrash\tslow"
    );
    assert_eq!(lines[2], "1\tTerrible service\t-\t-\t+\tError\tError\t0");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_backends_run_concurrently_per_document() {
    let backends: Vec<SharedBackend> = vec![
        Arc::new(Blocking("blocking-a")),
        Arc::new(Blocking("blocking-b")),
        Arc::new(Oracle),
    ];

    let start = std::time::Instant::now();
    let (report, _) = evaluate(backends).await;
    let elapsed = start.elapsed();

    assert_eq!(report.scores.len(), 3);
    // documents run one after another, blocking backends side by side:
    // 3 x 100ms, where serial calls would take 600ms
    assert!(elapsed >= Duration::from_millis(300), "took {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(550), "took {:?}", elapsed);
}

/// Holds its worker thread for 100ms, like a synchronous client would
struct Blocking(&'static str);

#[async_trait]
impl SentimentBackend for Blocking {
    fn name(&self) -> &str {
        self.0
    }

    async fn classify(&self, _text: &str) -> BackendResult<Label> {
        std::thread::sleep(Duration::from_millis(100));
        Ok(Label::Neutral)
    }
}

#[tokio::test]
async fn test_scorer_scenarios_through_pipeline() {
    let corpus = load_corpus_from_string("a\t+\nb\t0\n").unwrap();
    let registry = BackendRegistry::new(vec![
        Arc::new(Fixed("pos", Label::Positive)) as SharedBackend,
        Arc::new(Fixed("neg", Label::Negative)),
    ])
    .unwrap();

    let mut rows: Vec<DocumentRow> = Vec::new();
    let report = Evaluator::new(registry)
        .evaluate(&corpus, &mut rows)
        .await
        .unwrap();

    assert_eq!(report.max_weighted_errors, 3);

    // hit on the positive document, weight 1 on the neutral one
    let pos = report.get("pos").unwrap();
    assert_eq!((pos.hits, pos.weighted_errors), (1, 1));

    // reversal weight 2, plus weight 1 on the neutral document
    let neg = report.get("neg").unwrap();
    assert_eq!((neg.hits, neg.weighted_errors), (0, 3));
    assert_eq!(neg.error_rate, 1.0);
}
