use chance_core::{LotteryMode, LotteryRecord, LotteryStore};
use comfy_table::{presets::UTF8_FULL, Table};

fn created_display(record: &LotteryRecord) -> String {
    record
        .created_at()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn status(record: &LotteryRecord) -> &'static str {
    if record.has_result() {
        "Done"
    } else {
        "Pending"
    }
}

pub async fn show_lottery(store: &LotteryStore, id: &str) -> anyhow::Result<()> {
    let record = chance_lottery::load_lottery(store, id).await?;
    let mode = record.effective_mode();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Property", "Value"]);
    table.add_row(vec!["ID".to_string(), record.id.clone()]);
    table.add_row(vec!["Mode".to_string(), mode.to_string()]);
    table.add_row(vec!["Created".to_string(), created_display(&record)]);
    table.add_row(vec!["Status".to_string(), status(&record).to_string()]);
    table.add_row(vec![
        "Participants".to_string(),
        record.participants.join(", "),
    ]);
    if mode != LotteryMode::Matching {
        table.add_row(vec!["Tasks".to_string(), record.tasks.join(", ")]);
    }
    if let Some(winner) = &record.winner {
        table.add_row(vec!["Winner".to_string(), winner.clone()]);
    }
    if let Some(rotation) = record.rotation_degree {
        table.add_row(vec!["Rotation".to_string(), format!("{:.2}°", rotation)]);
    }
    println!("{}", table);

    if let Some(assignments) = &record.final_assignments {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Participant", "Assigned"]);
        for assignment in assignments {
            table.add_row(vec![&assignment.participant, &assignment.task]);
        }
        println!("{}", table);
    }

    Ok(())
}

pub async fn list_lotteries(store: &LotteryStore) -> anyhow::Result<()> {
    let lotteries = store.list_lotteries().await?;

    if lotteries.is_empty() {
        println!("No lotteries found");
        println!("Create one with: chance create");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Mode", "Participants", "Created", "Status"]);

    for record in &lotteries {
        table.add_row(vec![
            record.id.clone(),
            record.effective_mode().to_string(),
            record.participants.len().to_string(),
            created_display(record),
            status(record).to_string(),
        ]);
    }

    println!("{}", table);
    Ok(())
}
