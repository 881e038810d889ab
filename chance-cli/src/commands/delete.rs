use chance_core::LotteryStore;
use chance_lottery::LotteryError;
use dialoguer::Confirm;

pub async fn delete_lottery(store: &LotteryStore, id: &str, yes: bool) -> anyhow::Result<()> {
    if !store.lottery_exists(id).await? {
        return Err(LotteryError::NotFound(id.to_string()).into());
    }

    if !yes {
        let confirm = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete lottery '{}'? This action cannot be undone.",
                id
            ))
            .default(false)
            .interact()?;

        if !confirm {
            println!("Deletion cancelled");
            return Ok(());
        }
    }

    store.delete_lottery(id).await?;
    println!("Lottery '{}' deleted", id);
    Ok(())
}
