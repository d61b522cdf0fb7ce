/// Visual state a group of declarations applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    Default,
    Hover,
    /// Any other pseudo-class, stored without the leading colon.
    Pseudo(String),
}

impl Channel {
    pub fn pseudo(name: &str) -> Self {
        Self::from(name.trim().trim_start_matches(':'))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Hover => "hover",
            Self::Pseudo(name) => name,
        }
    }

    /// Text appended to a class selector for rules of this channel.
    pub fn selector_suffix(&self) -> String {
        match self {
            Self::Default => String::new(),
            Self::Hover => ":hover".to_owned(),
            Self::Pseudo(name) => format!(":{name}"),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Folds pseudo names that alias a named channel (`"hover"`, `"default"`,
    /// `":focus"`) into their canonical form.
    pub fn normalized(&self) -> Self {
        match self {
            Self::Pseudo(name) => Self::pseudo(name),
            other => other.clone(),
        }
    }
}

impl From<&str> for Channel {
    fn from(value: &str) -> Self {
        match value {
            "" | "default" => Self::Default,
            "hover" => Self::Hover,
            other => Self::Pseudo(other.to_owned()),
        }
    }
}
