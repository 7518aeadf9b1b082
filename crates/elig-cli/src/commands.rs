use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use elig_extract::MergeAdapter;
use elig_ingest::{ProtocolDocument, load_narrative_dataset, load_protocol};
use tracing::{info, info_span, warn};

use elig_cli::screening::{
    patient_ids_in, screen_folder, screen_notes, select_notes, trial_filter,
};
use elig_cli::types::ScreeningRun;

use crate::cli::{NotesArgs, PatientsArgs, RulesArgs};
use crate::summary::print_rules;

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let document = read_protocol(&args.protocol)?;
    print_rules(&document);
    Ok(())
}

pub fn run_notes(args: &NotesArgs) -> Result<ScreeningRun> {
    let span = info_span!("notes", dataset = %args.dataset.display());
    let _guard = span.enter();
    let start = Instant::now();

    let document = read_protocol(&args.protocol)?;
    let records = load_narrative_dataset(&args.dataset)
        .with_context(|| format!("load narrative dataset {}", args.dataset.display()))?;

    let trial_id = trial_filter(
        &records,
        args.trial_id.as_deref(),
        document.trial_id.as_deref(),
    );
    let selected = select_notes(&records, trial_id, args.patient.as_deref());
    if selected.is_empty() {
        warn!(
            rows = records.len(),
            trial_id = trial_id.unwrap_or("-"),
            patient = args.patient.as_deref().unwrap_or("-"),
            "no dataset rows match the selection"
        );
    }

    let artifact = args.dataset.display().to_string();
    let reports = screen_notes(selected, &document.protocol, &artifact);
    let run = ScreeningRun {
        protocol_name: document.name,
        trial_id: trial_id.map(str::to_string),
        source: args.dataset.clone(),
        reports,
    };
    log_run(&run, start);
    Ok(run)
}

pub fn run_patients(args: &PatientsArgs) -> Result<ScreeningRun> {
    let span = info_span!("patients", dir = %args.dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let document = read_protocol(&args.protocol)?;
    let adapter = MergeAdapter::new(args.sources.layout());

    let patient_ids = if args.patient_ids.is_empty() {
        let discovered = patient_ids_in(&args.dir, adapter.layout())
            .with_context(|| format!("scan patient folder {}", args.dir.display()))?;
        if discovered.is_empty() {
            bail!("no patient source files found in {}", args.dir.display());
        }
        discovered
    } else {
        args.patient_ids.clone()
    };
    info!(patients = patient_ids.len(), "screening patient folder");

    let reports = screen_folder(
        &adapter,
        &args.dir,
        &patient_ids,
        &document.protocol,
        args.assessment.as_deref(),
    );
    let run = ScreeningRun {
        protocol_name: document.name,
        trial_id: document.trial_id,
        source: args.dir.clone(),
        reports,
    };
    log_run(&run, start);
    Ok(run)
}

pub fn print_json(run: &ScreeningRun) -> Result<()> {
    let json = serde_json::to_string_pretty(run).context("serialize screening reports")?;
    println!("{json}");
    Ok(())
}

fn read_protocol(path: &Path) -> Result<ProtocolDocument> {
    let document =
        load_protocol(path).with_context(|| format!("load protocol {}", path.display()))?;
    info!(
        protocol = document.name.as_deref().unwrap_or("-"),
        rules = document.protocol.len(),
        "loaded protocol"
    );
    Ok(document)
}

fn log_run(run: &ScreeningRun, start: Instant) {
    let counts = run.counts();
    info!(
        patients = run.reports.len(),
        included = counts.included,
        excluded = counts.excluded,
        not_enough_information = counts.not_enough_information,
        duration_ms = start.elapsed().as_millis(),
        "screening complete"
    );
}
