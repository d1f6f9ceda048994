use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No contract template selected")]
    MissingTemplate,

    #[error("No currency selected")]
    MissingCurrency,

    #[error("Invalid applicant count: {count}")]
    InvalidApplicantCount { count: i64 },

    #[error("Invalid price {price} for tier '{tier}' in table '{table}'")]
    InvalidTierPrice {
        table: String,
        tier: String,
        price: i64,
    },

    #[error("Due date out of range: {start} + {days} days")]
    DateOutOfRange { start: chrono::NaiveDate, days: u64 },

    #[error("Contract {contract_id} is signed; pricing is read-only")]
    ContractLocked { contract_id: String },

    #[error("Invalid contract state: {message}")]
    InvalidContractState { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Template,
    Lifecycle,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PricingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::MissingCurrency
            | PricingError::InvalidApplicantCount { .. }
            | PricingError::DateOutOfRange { .. } => ErrorCategory::Input,
            PricingError::MissingTemplate | PricingError::InvalidTierPrice { .. } => {
                ErrorCategory::Template
            }
            PricingError::ContractLocked { .. } | PricingError::InvalidContractState { .. } => {
                ErrorCategory::Lifecycle
            }
            PricingError::ConfigError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PricingError::IoError(_)
            | PricingError::SerializationError(_)
            | PricingError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lifecycle => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Template | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PricingError::MissingTemplate => "Select a contract template before creating the contract",
            PricingError::MissingCurrency => "Select a currency before creating the contract",
            PricingError::InvalidApplicantCount { .. } => "Enter at least one applicant",
            PricingError::InvalidTierPrice { .. } => {
                "Fix the template's pricing tiers; prices must be zero or positive"
            }
            PricingError::DateOutOfRange { .. } => "Pick a realistic contract start date",
            PricingError::ContractLocked { .. } => {
                "Signed contracts cannot be repriced; create a new draft instead"
            }
            PricingError::InvalidContractState { .. } => "Check the contract status and retry",
            PricingError::ConfigError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. } => {
                "Check the quote configuration file against the documented format"
            }
            PricingError::IoError(_) => "Check that the file exists and is readable",
            PricingError::SerializationError(_) | PricingError::CsvError(_) => {
                "Re-run with --verbose and report the problem"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The pricing request is incomplete: {}", self),
            ErrorCategory::Template => format!("The contract template cannot be priced: {}", self),
            ErrorCategory::Lifecycle => format!("The contract cannot be changed: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::System => format!("An unexpected error occurred: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors_are_high_severity() {
        assert_eq!(PricingError::MissingTemplate.severity(), ErrorSeverity::High);
        assert_eq!(
            PricingError::InvalidApplicantCount { count: -2 }.category(),
            ErrorCategory::Input
        );
    }

    #[test]
    fn test_locked_contract_message() {
        let err = PricingError::ContractLocked {
            contract_id: "c-1".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("c-1"));
    }
}
