//! Edge case tests for batch updates on the in-memory store

use reinhardt_generic_admin::core::batch::{BatchApplier, BatchUpdateForm, TargetRecordSet};
use reinhardt_generic_admin::core::{
	AdminSite, BatchDatabase, BatchUpdateAdmin, BatchUpdateRenderer, InMemoryBatchDatabase,
	ModelField, ModelSchema, Relation,
};
use reinhardt_generic_admin::server::{
	AdminUser, BatchUpdateRequest, BatchUpdateViewContext, batch_update_view, into_http_response,
};
use reinhardt_generic_admin::types::{AdminError, BatchUpdateResponse};
use reinhardt_generic_forms::parse_form_data;
use rstest::{fixture, rstest};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn labels() -> Relation {
	Relation::new("Label", "shop_label", "shop_product_labels", "product_id", "label_id")
		.with_label_column("title")
}

fn product_schema() -> ModelSchema {
	ModelSchema::new("shop", "Product")
		.with_verbose_names("product", "products")
		.with_field(ModelField::float("price"))
		.with_field(ModelField::date("available_from"))
		.with_field(ModelField::many_to_many("labels", labels()).blank())
}

struct Shop {
	site: Arc<AdminSite>,
	db: Arc<InMemoryBatchDatabase>,
	ctx: BatchUpdateViewContext,
}

#[fixture]
fn shop() -> Shop {
	let site = Arc::new(AdminSite::new("admin"));
	site.register(
		BatchUpdateAdmin::new(product_schema())
			.with_batch_update_fields(["price", "available_from", "labels"])
			.with_max_batch_size(5),
	)
	.unwrap();

	let db = Arc::new(InMemoryBatchDatabase::new());
	for id in ["1", "2", "3"] {
		db.insert(
			"shop_product",
			id,
			HashMap::from([("price".to_string(), json!(10.0))]),
		);
	}
	for (id, title) in [("1", "new"), ("2", "sale")] {
		db.insert(
			"shop_label",
			id,
			HashMap::from([("title".to_string(), json!(title))]),
		);
	}
	db.link("shop_product_labels", "1", "1");

	let ctx = BatchUpdateViewContext::new(site.clone(), db.clone()).unwrap();
	Shop { site, db, ctx }
}

fn manager() -> AdminUser {
	AdminUser::new("manager").superuser()
}

async fn post(shop: &Shop, query: &str, body: &str) -> Result<BatchUpdateResponse, AdminError> {
	batch_update_view(
		&shop.ctx,
		"shop.product",
		BatchUpdateRequest::post(query, body, manager()),
	)
	.await
}

#[rstest]
#[tokio::test]
async fn test_scalar_update_is_one_bulk_statement(shop: Shop) {
	// Act
	let response = post(
		&shop,
		"ids=1,2,3",
		"updating-price=on&price=12.5&updating-available_from=on&available_from=2026-01-31",
	)
	.await
	.unwrap();

	// Assert
	assert!(response.is_redirect());
	assert_eq!(shop.db.bulk_statements(), 1);
	for id in ["1", "2", "3"] {
		let record = shop.db.record("shop_product", id).unwrap();
		assert_eq!(record.get("price"), Some(&json!(12.5)));
		assert_eq!(record.get("available_from"), Some(&json!("2026-01-31")));
	}
}

#[rstest]
#[tokio::test]
async fn test_adding_existing_reference_is_idempotent(shop: Shop) {
	// Act
	for _ in 0..2 {
		post(&shop, "ids=1,2", "updating-m2m_add_labels=on&m2m_add_labels=1")
			.await
			.unwrap();
	}

	// Assert
	let relation = labels();
	assert_eq!(shop.db.related_ids(&relation, "1").await.unwrap(), vec!["1"]);
	assert_eq!(shop.db.related_ids(&relation, "2").await.unwrap(), vec!["1"]);
}

#[rstest]
#[tokio::test]
async fn test_removing_absent_reference_is_a_no_op(shop: Shop) {
	// Act
	let response = post(&shop, "ids=1,2", "updating-m2m_remove_labels=on&m2m_remove_labels=2")
		.await
		.unwrap();

	// Assert
	match response {
		BatchUpdateResponse::Redirect { message, .. } => {
			assert_eq!(message.text, "Updated fields (labels) for 2 products");
		}
		other => panic!("expected redirect, got {:?}", other),
	}
	assert_eq!(
		shop.db.related_ids(&labels(), "1").await.unwrap(),
		vec!["1"]
	);
}

#[rstest]
#[tokio::test]
async fn test_add_then_remove_same_reference_leaves_it_absent(shop: Shop) {
	let body = "updating-m2m_add_labels=on&m2m_add_labels=2&updating-m2m_remove_labels=on&m2m_remove_labels=2";

	post(&shop, "ids=1,3", body).await.unwrap();

	let relation = labels();
	assert_eq!(shop.db.related_ids(&relation, "1").await.unwrap(), vec!["1"]);
	assert!(shop.db.related_ids(&relation, "3").await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_empty_target_set_touches_nothing(shop: Shop) {
	// Act
	let response = post(&shop, "ids=40,41", "updating-price=on&price=1")
		.await
		.unwrap();

	// Assert
	match response {
		BatchUpdateResponse::Redirect { message, .. } => {
			assert_eq!(message.text, "Updated fields (price) for 0 products");
		}
		other => panic!("expected redirect, got {:?}", other),
	}
	assert_eq!(shop.db.bulk_statements(), 0);
}

#[rstest]
#[tokio::test]
async fn test_storage_failure_is_hidden_from_client(shop: Shop) {
	// Arrange
	shop.db.set_fail_writes(true);

	// Act
	let result = post(&shop, "ids=1", "updating-price=on&price=3").await;

	// Assert
	assert!(matches!(result, Err(AdminError::DatabaseError(_))));
	let response = into_http_response(result);
	assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(response.body().as_ref(), b"Database operation failed");
}

#[rstest]
#[case("ids=1,2,3,4,5,6", AdminError::ValidationError(String::new()))]
#[case("ids=1", AdminError::ModelNotRegistered(String::new()))]
#[tokio::test]
async fn test_request_errors(shop: Shop, #[case] query: &str, #[case] expected: AdminError) {
	// Arrange
	let model = match expected {
		AdminError::ModelNotRegistered(_) => "shop.order",
		_ => "shop.product",
	};

	// Act
	let result = batch_update_view(&shop.ctx, model, BatchUpdateRequest::get(query, manager())).await;

	// Assert
	let error = result.unwrap_err();
	assert_eq!(
		std::mem::discriminant(&error),
		std::mem::discriminant(&expected)
	);
}

#[rstest]
#[tokio::test]
async fn test_custom_template_directory(shop: Shop) {
	// Arrange
	let dir = tempfile::tempdir().unwrap();
	let app_dir = dir.path().join("admin").join("shop");
	std::fs::create_dir_all(&app_dir).unwrap();
	std::fs::write(
		app_dir.join("batch_update.html"),
		"{{ count }} {{ count_label }}:{% for field in fields %} {{ field.name }}{% endfor %}",
	)
	.unwrap();
	let ctx = BatchUpdateViewContext::new(shop.site.clone(), shop.db.clone())
		.unwrap()
		.with_renderer(BatchUpdateRenderer::from_template_dirs(&[dir.path()]).unwrap());

	// Act
	let response = batch_update_view(
		&ctx,
		"shop.product",
		BatchUpdateRequest::get("ids=2,2,99", manager()),
	)
	.await
	.unwrap();

	// Assert
	match response {
		BatchUpdateResponse::Form { html, .. } => {
			assert_eq!(
				html,
				"1 product: price available_from m2m_remove_labels m2m_add_labels"
			);
		}
		other => panic!("expected form, got {:?}", other),
	}
}

#[rstest]
#[tokio::test]
async fn test_applier_used_without_the_view(shop: Shop) {
	// Arrange
	let admin = shop.site.get_model_admin("shop.product").unwrap();
	let choices = HashMap::from([(
		"labels".to_string(),
		shop.db.related_choices(&labels()).await.unwrap(),
	)]);
	let mut form = BatchUpdateForm::new(admin.descriptors().unwrap(), &choices);
	form.bind(parse_form_data("updating-m2m_add_labels=on&m2m_add_labels=2").unwrap());
	assert!(form.is_valid());
	let applier = BatchApplier::new(shop.db.clone(), admin.schema().clone());

	// Act
	let result = applier
		.apply(&TargetRecordSet::from_ids(["2", "3"]), form.values().unwrap())
		.await
		.unwrap();

	// Assert
	assert_eq!(result.scalar_rows, None);
	assert_eq!(result.records_visited, 2);
	assert_eq!(result.count(), 2);
	assert_eq!(shop.db.related_ids(&labels(), "3").await.unwrap(), vec!["2"]);
}

#[rstest]
#[tokio::test]
async fn test_text_primary_keys_with_leading_zeros_stay_distinct() {
	// Arrange
	let site = Arc::new(AdminSite::new("admin"));
	site.register(
		BatchUpdateAdmin::new(
			ModelSchema::new("shop", "Voucher")
				.with_pk_field("code")
				.with_field(ModelField::boolean("active")),
		)
		.with_batch_update_fields(["active"]),
	)
	.unwrap();
	let db = Arc::new(InMemoryBatchDatabase::new());
	for code in ["007", "7"] {
		db.insert(
			"shop_voucher",
			code,
			HashMap::from([("active".to_string(), json!(false))]),
		);
	}
	let ctx = BatchUpdateViewContext::new(site, db.clone()).unwrap();

	// Act
	let response = batch_update_view(
		&ctx,
		"shop.voucher",
		BatchUpdateRequest::post("ids=007", "updating-active=on&active=on", manager()),
	)
	.await
	.unwrap();

	// Assert
	assert!(response.is_redirect());
	assert_eq!(
		db.record("shop_voucher", "007").unwrap().get("active"),
		Some(&json!(true))
	);
	assert_eq!(
		db.record("shop_voucher", "7").unwrap().get("active"),
		Some(&json!(false))
	);
}
