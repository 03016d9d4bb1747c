//! Cleaning submitted form data through typed fields

use reinhardt_generic_forms::{
	BooleanField, BoundField, CharField, ChoiceField, DateField, FieldError, FloatField,
	FormErrors, FormField, IntegerField, ModelMultipleChoiceField, parse_form_data,
};
use rstest::rstest;
use serde_json::{Value, json};

fn tag_choices() -> Vec<(String, String)> {
	vec![
		("1".to_string(), "rust".to_string()),
		("2".to_string(), "web".to_string()),
	]
}

/// Clean every field against the same body, collecting errors by name
fn clean_all(fields: &[Box<dyn FormField>], body: &str) -> (Vec<(String, Value)>, FormErrors) {
	let data = parse_form_data(body).unwrap();
	let mut cleaned = Vec::new();
	let mut errors = FormErrors::new();
	for field in fields {
		match field.clean(data.get(field.name())) {
			Ok(value) => cleaned.push((field.name().to_string(), value)),
			Err(error) => errors.add(field.name(), error.to_string()),
		}
	}
	(cleaned, errors)
}

#[rstest]
fn test_mixed_form_cleans_each_field() {
	// Arrange
	let fields: Vec<Box<dyn FormField>> = vec![
		Box::new(CharField::new("title").with_max_length(10)),
		Box::new(IntegerField::new("rank")),
		Box::new(FloatField::new("price")),
		Box::new(BooleanField::new("featured")),
		Box::new(DateField::new("published_on")),
		Box::new(ChoiceField::new(
			"status",
			vec![("draft".to_string(), "Draft".to_string())],
		)),
		Box::new(ModelMultipleChoiceField::new("tags", tag_choices())),
	];
	let body = "title=Hello&rank=3&price=9.5&featured=on&published_on=2026-10-16&status=draft&tags=2&tags=1";

	// Act
	let (cleaned, errors) = clean_all(&fields, body);

	// Assert
	assert!(errors.is_empty());
	assert_eq!(
		cleaned,
		vec![
			("title".to_string(), json!("Hello")),
			("rank".to_string(), json!(3)),
			("price".to_string(), json!(9.5)),
			("featured".to_string(), json!(true)),
			("published_on".to_string(), json!("2026-10-16")),
			("status".to_string(), json!("draft")),
			("tags".to_string(), json!(["2", "1"])),
		]
	);
}

#[rstest]
fn test_invalid_values_are_collected_per_field() {
	// Arrange
	let fields: Vec<Box<dyn FormField>> = vec![
		Box::new(CharField::new("title").with_max_length(3).required(true)),
		Box::new(IntegerField::new("rank")),
		Box::new(ModelMultipleChoiceField::new("tags", tag_choices())),
	];

	// Act
	let (_, errors) = clean_all(&fields, "title=Too+long&rank=abc&tags=7");

	// Assert
	assert_eq!(errors.fields(), vec!["rank", "tags", "title"]);
	assert_eq!(
		errors.get("tags"),
		&["Select a valid choice. 7 is not one of the available choices.".to_string()]
	);
	assert!(errors.non_field_errors().is_empty());
}

#[rstest]
#[case("", false)]
#[case("flag=on", true)]
#[case("flag=off", false)]
#[case("flag=1", true)]
#[case("flag=false", false)]
fn test_checkbox_semantics(#[case] body: &str, #[case] expected: bool) {
	let field = BooleanField::new("flag");
	let data = parse_form_data(body).unwrap();

	let cleaned = field.clean(data.get("flag")).unwrap();

	assert_eq!(cleaned, json!(expected));
}

#[rstest]
fn test_required_multiple_choice_rejects_empty_selection() {
	let field = ModelMultipleChoiceField::new("tags", tag_choices()).required(true);

	let result = field.clean(None);

	assert_eq!(result, Err(FieldError::required()));
}

#[rstest]
fn test_bound_field_escapes_submitted_value() {
	// Arrange
	let field = CharField::new("title");
	let data = parse_form_data("title=%3Cb%3Ehi%3C%2Fb%3E").unwrap();

	// Act
	let html = BoundField::new(&field, data.get("title"), &[], "").as_widget();

	// Assert
	assert!(!html.contains("<b>"));
	assert!(html.contains("&lt;b&gt;hi"));
}
