use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use elig_engine::RuleOutcome;
use elig_ingest::ProtocolDocument;
use elig_model::{OverallStatus, ProfileField, RuleKind, RuleStatus};

use elig_cli::types::{PatientReport, ScreeningRun};

pub fn print_run(run: &ScreeningRun) {
    println!();
    let title = match (&run.protocol_name, &run.trial_id) {
        (Some(name), Some(trial)) => format!("{name} ({trial})"),
        (Some(name), None) => name.clone(),
        (None, Some(trial)) => trial.clone(),
        (None, None) => "Protocol".to_string(),
    };
    println!("{title}: {}", run.source.display());

    if run.reports.is_empty() {
        println!("No patients to screen.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Assessment"),
        header_cell("Verdict"),
        header_cell("Pass"),
        header_cell("Fail"),
        header_cell("Miss"),
        header_cell("Missing Fields"),
    ]);
    apply_summary_table_style(&mut table);
    for idx in 3..6 {
        align_column(&mut table, idx, CellAlignment::Right);
    }

    for report in &run.reports {
        let missing = if report.missing_fields.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(
                report
                    .missing_fields
                    .iter()
                    .map(ProfileField::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&report.patient_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            assessment_cell(report.expert_eligibility.as_deref()),
            verdict_cell(report.overall_status),
            count_cell(report.result.count(RuleStatus::Passed), Color::Green),
            count_cell(report.result.count(RuleStatus::Failed), Color::Red),
            count_cell(report.result.count(RuleStatus::Missing), Color::Yellow),
            missing,
        ]);
    }

    let counts = run.counts();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!(
            "{} included, {} excluded, {} undecided",
            counts.included, counts.excluded, counts.not_enough_information
        ))
        .add_attribute(Attribute::Bold),
        dim_cell(""),
        dim_cell(""),
        dim_cell(""),
        dim_cell(""),
    ]);

    println!("{table}");
}

pub fn print_breakdowns(run: &ScreeningRun) {
    for report in &run.reports {
        print_breakdown(report);
    }
}

fn print_breakdown(report: &PatientReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Type"),
        header_cell("Criterion"),
        header_cell("Observed"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for outcome in &report.rules {
        table.add_row(vec![
            Cell::new(&outcome.rule_id),
            kind_cell(outcome.kind),
            Cell::new(&outcome.label),
            observed_cell(outcome),
            status_cell(outcome.status),
        ]);
    }
    println!();
    println!("{} -> {}", report.patient_id, report.overall_status);
    if report.overall_status == OverallStatus::NotEnoughInformation {
        println!("Decision requires additional data for the missing fields.");
    }
    println!("{table}");
}

pub fn print_rules(document: &ProtocolDocument) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Type"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Op"),
        header_cell("Value"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    for rule in document.protocol.iter() {
        let description = match &rule.description {
            Some(text) => Cell::new(text),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&rule.id).add_attribute(Attribute::Bold),
            kind_cell(rule.kind),
            Cell::new(rule.field),
            dim_cell(rule.field.kind()),
            Cell::new(rule.operator),
            Cell::new(&rule.value),
            description,
        ]);
    }
    if let Some(name) = &document.name {
        println!("{name}");
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn verdict_cell(status: OverallStatus) -> Cell {
    match status {
        OverallStatus::Included => Cell::new("INCLUDED")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        OverallStatus::Excluded => Cell::new("EXCLUDED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        OverallStatus::NotEnoughInformation => Cell::new("NOT ENOUGH INFO").fg(Color::Yellow),
    }
}

fn status_cell(status: RuleStatus) -> Cell {
    match status {
        RuleStatus::Passed => Cell::new("PASSED").fg(Color::Green),
        RuleStatus::Failed => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        RuleStatus::Missing => Cell::new("MISSING").fg(Color::Yellow),
    }
}

fn kind_cell(kind: RuleKind) -> Cell {
    match kind {
        RuleKind::Inclusion => Cell::new("incl").fg(Color::Cyan),
        RuleKind::Exclusion => Cell::new("excl").fg(Color::Magenta),
    }
}

fn observed_cell(outcome: &RuleOutcome) -> Cell {
    match &outcome.observed {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn assessment_cell(assessment: Option<&str>) -> Cell {
    match assessment {
        Some(text) => Cell::new(text),
        None => dim_cell("N/A"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
