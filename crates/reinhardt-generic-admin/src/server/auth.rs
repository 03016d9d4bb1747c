//! Authorization for admin endpoints

use crate::core::BatchUpdateAdmin;
use crate::types::{AdminError, AdminResult};
use async_trait::async_trait;
use std::collections::HashSet;

/// The user performing an admin request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminUser {
	pub user_id: String,
	pub is_active: bool,
	pub is_staff: bool,
	pub is_superuser: bool,
	/// Permission codenames such as `blog.change_article`
	pub permissions: HashSet<String>,
}

impl AdminUser {
	/// Active user without staff status or permissions
	pub fn new(user_id: impl Into<String>) -> Self {
		Self {
			user_id: user_id.into(),
			is_active: true,
			..Default::default()
		}
	}

	pub fn staff(mut self) -> Self {
		self.is_staff = true;
		self
	}

	pub fn superuser(mut self) -> Self {
		self.is_staff = true;
		self.is_superuser = true;
		self
	}

	pub fn inactive(mut self) -> Self {
		self.is_active = false;
		self
	}

	pub fn with_permission(mut self, codename: impl Into<String>) -> Self {
		self.permissions.insert(codename.into());
		self
	}

	/// Superusers hold every permission while active
	pub fn has_perm(&self, codename: &str) -> bool {
		self.is_active && (self.is_superuser || self.permissions.contains(codename))
	}
}

/// Decides whether a user may batch update a model
#[async_trait]
pub trait PermissionChecker: Send + Sync {
	async fn has_change_permission(&self, user: &AdminUser, admin: &BatchUpdateAdmin) -> bool;
}

/// Active staff users holding the model's change permission
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPermissionChecker;

#[async_trait]
impl PermissionChecker for DefaultPermissionChecker {
	async fn has_change_permission(&self, user: &AdminUser, admin: &BatchUpdateAdmin) -> bool {
		user.is_active && user.is_staff && user.has_perm(&admin.change_permission())
	}
}

/// Fail with [`AdminError::PermissionDenied`] unless `user` may change the model
pub async fn require_change_permission(
	checker: &dyn PermissionChecker,
	user: &AdminUser,
	admin: &BatchUpdateAdmin,
) -> AdminResult<()> {
	if checker.has_change_permission(user, admin).await {
		return Ok(());
	}
	Err(permission_denied(user, admin))
}

pub(crate) fn permission_denied(user: &AdminUser, admin: &BatchUpdateAdmin) -> AdminError {
	tracing::warn!(
		user_id = %user.user_id,
		model = %admin.schema().label(),
		"Batch update denied"
	);
	AdminError::PermissionDenied(format!(
		"You do not have permission to change {}",
		admin.schema().verbose_name_plural
	))
}
