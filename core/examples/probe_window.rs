//! Example: Probe every port in the default window and show who holds it.

use devport_core::{PortProbe, ProbeOutcome, ScanWindow, SystemProbe};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let window = ScanWindow::default();
    let probe = SystemProbe::default();

    println!("Probing {} with strategy '{}'...\n", window, probe.strategy());
    println!("{:<6} {:<10} {}", "PORT", "STATE", "LISTENERS");
    println!("{}", "-".repeat(60));

    let mut first_free = None;
    for port in window.candidates() {
        let outcome = probe.probe(port).await;
        if outcome.is_free() && first_free.is_none() {
            first_free = Some(port);
        }

        let detail = match &outcome {
            ProbeOutcome::Unknown { reason } => reason.clone(),
            other => other
                .listeners()
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        };
        let state = match &outcome {
            ProbeOutcome::Free => "free",
            ProbeOutcome::Occupied { .. } => "occupied",
            ProbeOutcome::Unknown { .. } => "unknown",
        };

        println!("{:<6} {:<10} {}", port, state, detail);
    }

    match first_free {
        Some(port) => println!("\nFirst free port: {}", port),
        None => println!("\nNo free port found in range {}", window),
    }
}
