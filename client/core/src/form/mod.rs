//! Generic create/edit form engine

pub mod field;
pub mod options;
pub mod state;
pub mod validate;
pub mod view;

pub use field::{
    all_fields, coerce_initial, coerce_input, default_value_for_field, form_data_to_json, parse_int,
    FieldType, FieldValue, FormData, FormField, FormSection, InputValue, Validator,
    DATA_RETENTION_DAYS, PRIVACY_CONSENT_ACCEPTED,
};
pub use options::{OptionLoader, OptionProvider, OptionSource, SelectOption};
pub use state::{FormState, SubmitOutcome};
pub use validate::{is_empty_value, validate_field, validate_form_fields, validate_number_min};
pub use view::{ActionLayout, Control, ControlView, FormView, SectionView};
