//! Shared Access Signature tokens for the Azure IoT Device Provisioning
//! Service.
//!
//! ```
//! let header = azure_dps_sas::generate_sas_token(
//!     "0ne009ABCDE/registrations/dps-test-device-1",
//!     "AAAAAAAAAAAAAAAAAAAAAA==",
//!     "registration",
//!     3600,
//! )
//! .unwrap();
//! assert!(header.starts_with("SharedAccessSignature sr=0ne009ABCDE%2Fregistrations%2F"));
//! ```

mod encoding;
pub mod error;
pub mod key;
pub mod settings;
pub mod token;

pub use error::{Error, Result};
pub use key::SigningKey;
pub use settings::ProvisioningSettings;
pub use token::{
    generate_sas_token, generate_sas_token_at, generate_sas_token_default,
    registration_resource_uri, SasToken, SigningInput, DEFAULT_TTL_SECS,
};
