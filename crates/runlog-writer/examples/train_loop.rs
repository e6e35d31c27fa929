use std::collections::BTreeMap;
use std::io::Write;

use runlog_writer::{NullRunWriter, RunRecorder, RunWriter};
use serde_json::json;

fn main() {
    let record = std::env::args().all(|arg| arg != "--no-record");

    let mut capture = None;
    let mut recorder: Box<dyn RunRecorder> = if record {
        let writer = RunWriter::create("runs", "demo").expect("create run");
        println!("recording under {}", writer.run_dir().display());
        capture = Some(writer.capture_stdio().expect("capture stdio"));
        Box::new(writer)
    } else {
        Box::new(NullRunWriter::new())
    };

    recorder
        .write_json("config", &json!({"lr": 0.001, "epochs": 3}))
        .expect("config");

    let mut loss = 4.0f64;
    for epoch in 0..3u64 {
        for step in 0..5u64 {
            loss *= 0.95;
            recorder
                .write_scalar("loss", loss, Some(epoch * 5 + step))
                .expect("scalar");
        }
        if let Some(capture) = capture.as_mut() {
            writeln!(capture.out(), "epoch {epoch}: loss {loss:.4}").expect("console");
        }
        let state = (epoch, loss);
        recorder
            .write_checkpoint("latest", &bincode::serialize(&state).expect("encode"))
            .expect("checkpoint");
    }

    let mut metrics = BTreeMap::new();
    metrics.insert("final_loss".to_string(), loss);
    let mut hparams = BTreeMap::new();
    hparams.insert("lr".to_string(), json!(0.001));
    recorder.write_hparams(&hparams, &metrics).expect("hparams");
}
