//! Audit logging for admin mutations
//!
//! Audit records are structured `tracing` events on a dedicated target so
//! they can be routed separately from application logs.

/// Target of every audit event
pub const AUDIT_TARGET: &str = "reinhardt_generic::audit";

/// Record a batch update attempt
pub fn log_batch_update(
	user_id: &str,
	model: &str,
	ids: &[String],
	fields: &[String],
	count: u64,
	success: bool,
) {
	if success {
		tracing::info!(
			target: AUDIT_TARGET,
			action = "batch_update",
			user_id,
			model,
			targets = ids.len(),
			ids = %ids.join(","),
			fields = %fields.join(","),
			count,
			success,
			"Batch update applied"
		);
	} else {
		tracing::error!(
			target: AUDIT_TARGET,
			action = "batch_update",
			user_id,
			model,
			targets = ids.len(),
			ids = %ids.join(","),
			fields = %fields.join(","),
			success,
			"Batch update failed"
		);
	}
}
