use chance_core::{LotteryMode, LotteryStore};
use chance_lottery::LotteryDraft;
use dialoguer::{Input, Select};

pub async fn create_lottery(
    store: &LotteryStore,
    participants: Vec<String>,
    tasks: Vec<String>,
    mode: LotteryMode,
) -> anyhow::Result<()> {
    let draft = if participants.is_empty() {
        prompt_draft(mode)?
    } else {
        LotteryDraft::from_parts(participants, tasks, mode)
    };

    let record = chance_lottery::create_lottery(store, &draft).await?;

    println!("Lottery created!");
    println!("ID: {}", record.id);
    println!("Mode: {}", record.effective_mode());
    println!("Participants: {}", record.participants.join(", "));
    if record.effective_mode() != LotteryMode::Matching {
        println!("Tasks: {}", record.tasks.join(", "));
    }
    println!();
    println!("Run it with: chance run {}", record.id);

    Ok(())
}

fn prompt_draft(default_mode: LotteryMode) -> anyhow::Result<LotteryDraft> {
    let modes = [
        LotteryMode::SingleTask,
        LotteryMode::MultiOption,
        LotteryMode::Matching,
    ];
    let labels = [
        "One task, spin the wheel",
        "One option per participant",
        "Pair participants with each other",
    ];
    let default = modes.iter().position(|m| *m == default_mode).unwrap_or(0);

    let choice = Select::new()
        .with_prompt("Lottery type")
        .items(&labels)
        .default(default)
        .interact()?;

    let mut draft = LotteryDraft::new();
    draft.set_mode(modes[choice]);

    println!("Enter participant names, leave empty to finish.");
    let mut count = 0;
    loop {
        let name: String = Input::new()
            .with_prompt(format!("Participant #{}", count + 1))
            .allow_empty(true)
            .interact_text()?;

        if name.trim().is_empty() {
            if count >= draft.mode().min_participants() {
                break;
            }
            println!(
                "This lottery needs at least {} participants",
                draft.mode().min_participants()
            );
            continue;
        }

        if count == 0 {
            draft.set_participant(0, name)?;
        } else {
            draft.add_participant(name);
        }
        count += 1;
    }

    match draft.mode() {
        LotteryMode::SingleTask => {
            let task: String = Input::new().with_prompt("Task").interact_text()?;
            draft.set_task(0, task)?;
        }
        LotteryMode::MultiOption => {
            for index in 0..draft.participants().len() {
                let option: String = Input::new()
                    .with_prompt(format!("Option #{}", index + 1))
                    .interact_text()?;
                draft.set_task(index, option)?;
            }
        }
        LotteryMode::Matching => {}
    }

    Ok(draft)
}
