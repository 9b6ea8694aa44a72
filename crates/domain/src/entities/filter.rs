use crate::entities::User;

/// Field a list query may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Email,
    Country,
    Nickname,
    LastName,
    FirstName,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::Email,
        FilterField::Country,
        FilterField::Nickname,
        FilterField::LastName,
        FilterField::FirstName,
    ];

    /// External name, shared by query parameters and stored documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Email => "email",
            FilterField::Country => "country",
            FilterField::Nickname => "nickname",
            FilterField::LastName => "lastName",
            FilterField::FirstName => "firstName",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    fn value_of<'a>(&self, user: &'a User) -> &'a str {
        match self {
            FilterField::Email => user.email.as_str(),
            FilterField::Country => user.country.as_str(),
            FilterField::Nickname => user.nickname.as_str(),
            FilterField::LastName => user.last_name.as_str(),
            FilterField::FirstName => user.first_name.as_str(),
        }
    }
}

/// Sparse conjunction of exact-match predicates. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub email: Option<String>,
    pub country: Option<String>,
    pub nickname: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a predicate. Empty values leave the field unconstrained.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        let value = if value.is_empty() { None } else { Some(value) };
        *self.slot_mut(field) = value;
    }

    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Email => self.email.as_deref(),
            FilterField::Country => self.country.as_deref(),
            FilterField::Nickname => self.nickname.as_deref(),
            FilterField::LastName => self.last_name.as_deref(),
            FilterField::FirstName => self.first_name.as_deref(),
        }
    }

    /// Populated predicates only.
    pub fn predicates(&self) -> Vec<(FilterField, &str)> {
        FilterField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    pub fn matches(&self, user: &User) -> bool {
        self.predicates()
            .into_iter()
            .all(|(field, value)| field.value_of(user) == value)
    }

    fn slot_mut(&mut self, field: FilterField) -> &mut Option<String> {
        match field {
            FilterField::Email => &mut self.email,
            FilterField::Country => &mut self.country,
            FilterField::Nickname => &mut self.nickname,
            FilterField::LastName => &mut self.last_name,
            FilterField::FirstName => &mut self.first_name,
        }
    }
}
