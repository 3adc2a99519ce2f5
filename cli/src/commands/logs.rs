use planlog_core::api::{CancellationToken, CliError, Plans};
use tokio::io::AsyncWrite;

/// Stream the log of `plan_id` into `out` until the plan finishes.
pub async fn stream_logs<W>(
    plans: &Plans,
    plan_id: &str,
    cancel: CancellationToken,
    out: &mut W,
) -> Result<u64, CliError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut reader = plans.logs(plan_id, cancel).await?;
    tracing::info!(
        target: "planlog.cli",
        plan_id = %plan_id,
        url = %reader.log_url().host_str().unwrap_or_default(),
        "streaming plan log"
    );
    let written = reader.copy_to(out).await?;
    tracing::info!(target: "planlog.cli", plan_id = %plan_id, bytes = written, "plan log complete");
    Ok(written)
}

/// A token that is cancelled on the first Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!(target: "planlog.cli", "interrupt received, stopping log stream");
            trigger.cancel();
        }
    });
    cancel
}
