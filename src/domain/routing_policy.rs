// Default notification routing policy and its editable form projection
use super::duration::{self, DurationField, PromDuration};
use super::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Persisted root routing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    /// Contact point notifications are routed to.
    pub receiver_id: String,
    #[serde(default)]
    pub group_by_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<PromDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<PromDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<PromDuration>,
}

impl RoutingPolicy {
    pub fn new(receiver_id: impl Into<String>) -> Self {
        Self {
            receiver_id: receiver_id.into(),
            group_by_labels: Vec::new(),
            group_wait: None,
            group_interval: None,
            repeat_interval: None,
        }
    }

    pub fn duration(&self, field: DurationField) -> Option<PromDuration> {
        match field {
            DurationField::GroupWait => self.group_wait,
            DurationField::GroupInterval => self.group_interval,
            DurationField::RepeatInterval => self.repeat_interval,
        }
    }

    fn set_duration(&mut self, field: DurationField, value: Option<PromDuration>) {
        match field {
            DurationField::GroupWait => self.group_wait = value,
            DurationField::GroupInterval => self.group_interval = value,
            DurationField::RepeatInterval => self.repeat_interval = value,
        }
    }

    /// Configured value, or the system default when unset.
    pub fn effective_duration(&self, field: DurationField) -> PromDuration {
        self.duration(field)
            .unwrap_or_else(|| field.default_duration())
    }
}

/// Labels offered in the group-by selector during one editing session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupByCatalog {
    labels: Vec<String>,
}

impl GroupByCatalog {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for label in labels {
            catalog.insert(label.into());
        }
        catalog
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Appends `label` unless it is already offered. Returns whether it was new.
    pub fn insert(&mut self, label: String) -> bool {
        if self.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Editable projection of a [`RoutingPolicy`]. Durations stay free text until submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicyForm {
    #[serde(default)]
    pub receiver_id: String,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub group_wait: String,
    #[serde(default)]
    pub group_interval: String,
    #[serde(default)]
    pub repeat_interval: String,
    #[serde(default)]
    pub catalog: GroupByCatalog,
}

impl RoutingPolicyForm {
    pub fn from_policy(policy: &RoutingPolicy, common_labels: &[String]) -> Self {
        let render = |field| {
            policy
                .duration(field)
                .map(|d| d.to_string())
                .unwrap_or_default()
        };

        let catalog = GroupByCatalog::new(
            common_labels
                .iter()
                .chain(policy.group_by_labels.iter())
                .cloned(),
        );

        Self {
            receiver_id: policy.receiver_id.clone(),
            group_by: policy.group_by_labels.clone(),
            group_wait: render(DurationField::GroupWait),
            group_interval: render(DurationField::GroupInterval),
            repeat_interval: render(DurationField::RepeatInterval),
            catalog,
        }
    }

    pub fn duration_text(&self, field: DurationField) -> &str {
        match field {
            DurationField::GroupWait => &self.group_wait,
            DurationField::GroupInterval => &self.group_interval,
            DurationField::RepeatInterval => &self.repeat_interval,
        }
    }

    /// Validate every field and build the policy. All errors are returned together.
    pub fn to_policy(&self) -> Result<RoutingPolicy, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.receiver_id.trim().is_empty() {
            errors.push(ValidationError::MissingReceiver);
        }

        let mut policy = RoutingPolicy::new(self.receiver_id.clone());
        policy.group_by_labels = self.group_by.clone();

        for field in DurationField::ALL {
            match duration::parse(self.duration_text(field)) {
                Ok(value) => policy.set_duration(field, value),
                Err(e) => errors.push(ValidationError::invalid_duration(field, &e)),
            }
        }

        if errors.is_empty() {
            Ok(policy)
        } else {
            Err(errors)
        }
    }

    /// Select a label typed by the user, keeping it in the session catalog so
    /// it stays selectable. Blank labels are ignored.
    pub fn add_custom_label(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        self.catalog.insert(label.to_string());
        if self.group_by.iter().any(|l| l == label) {
            return false;
        }
        self.group_by.push(label.to_string());
        true
    }

    pub fn schema() -> Vec<FieldSchema> {
        let mut fields = vec![FieldSchema {
            name: "receiver_id",
            label: "Default contact point",
            description: "",
            default_value: String::new(),
            required: true,
            validator: validate_receiver,
        }];
        fields.extend(DurationField::ALL.into_iter().map(|field| FieldSchema {
            name: field.name(),
            label: field.label(),
            description: field_description(field),
            default_value: field.default_duration().to_string(),
            required: false,
            validator: validate_duration,
        }));
        fields
    }
}

/// Run the schema validator of a single field, as a form renderer does on
/// input. `None` when no field has that name.
pub fn validate_field(name: &str, value: &str) -> Option<Result<(), String>> {
    RoutingPolicyForm::schema()
        .iter()
        .find(|field| field.name == name)
        .map(|field| field.validate(value))
}

fn field_description(field: DurationField) -> &'static str {
    match field {
        DurationField::GroupWait => {
            "The waiting time until the initial notification is sent for a new group created by an incoming alert."
        }
        DurationField::GroupInterval => {
            "The waiting time to send a batch of new alerts for that group after the first notification was sent."
        }
        DurationField::RepeatInterval => {
            "The waiting time to resend an alert after they have successfully been sent."
        }
    }
}

fn validate_receiver(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Required.".to_string());
    }
    Ok(())
}

fn validate_duration(value: &str) -> Result<(), String> {
    duration::validate(value).map_err(|e| e.to_string())
}

/// Field definition handed to a form renderer.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Shown as placeholder; applied when the field is left empty.
    pub default_value: String,
    pub required: bool,
    #[serde(skip)]
    pub validator: fn(&str) -> Result<(), String>,
}

impl FieldSchema {
    pub fn validate(&self, value: &str) -> Result<(), String> {
        (self.validator)(value)
    }
}
