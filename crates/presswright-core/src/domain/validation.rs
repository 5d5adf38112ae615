use crate::domain::{
    command::WpCommand,
    entities::{Constants, SiteConfiguration},
    error::DomainError,
};

/// Centralized domain validation.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_site_configuration(config: &SiteConfiguration) -> Result<(), DomainError> {
        config.validate()
    }

    pub fn validate_constants(constants: &Constants) -> Result<(), DomainError> {
        if constants.paths.wordpress.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "paths.wordpress",
            });
        }
        for entry in &constants.regex_base64 {
            entry.decode()?;
        }
        Ok(())
    }

    pub fn validate_command(command: &WpCommand) -> Result<(), DomainError> {
        command.validate()
    }
}
