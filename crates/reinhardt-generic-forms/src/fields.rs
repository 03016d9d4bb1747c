pub mod boolean_field;
pub mod char_field;
pub mod choice_field;
pub mod date_field;
pub mod float_field;
pub mod integer_field;
pub mod model_choice_field;

pub use boolean_field::BooleanField;
pub use char_field::CharField;
pub use choice_field::ChoiceField;
pub use date_field::DateField;
pub use float_field::FloatField;
pub use integer_field::IntegerField;
pub use model_choice_field::ModelMultipleChoiceField;
