use planlog_core::api::{CliError, Plans};
use std::io::Write;

pub async fn show<W: Write>(plans: &Plans, plan_id: &str, out: &mut W) -> Result<(), CliError> {
    let plan = plans.read(plan_id).await?;
    serde_json::to_writer_pretty(&mut *out, &plan).map_err(anyhow::Error::from)?;
    writeln!(out)?;
    Ok(())
}

pub async fn json_output<W: Write>(
    plans: &Plans,
    plan_id: &str,
    out: &mut W,
) -> Result<(), CliError> {
    let body = plans.read_json_output(plan_id).await?;
    out.write_all(&body)?;
    writeln!(out)?;
    Ok(())
}

/// One line per changed resource: `<actions>  <address>`.
pub async fn resource_changes<W: Write>(
    plans: &Plans,
    plan_id: &str,
    out: &mut W,
) -> Result<(), CliError> {
    let changes = plans.read_resource_changes(plan_id).await?;
    for rc in &changes.resource_changes {
        let actions = if rc.change.actions.is_empty() {
            "no-op".to_string()
        } else {
            rc.change.actions.join(",")
        };
        writeln!(out, "{:<16} {}", actions, rc.address)?;
    }
    Ok(())
}
