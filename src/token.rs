use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use crate::encoding::quote_plus;
use crate::error::{Error, Result};
use crate::key::SigningKey;

/// Lifetime used when the caller has no preference: one hour.
pub const DEFAULT_TTL_SECS: i64 = 3600;

const SCHEME: &str = "SharedAccessSignature";

/// Builds the DPS registration resource, `<scopeId>/registrations/<registrationId>`.
pub fn registration_resource_uri(scope_id: &str, registration_id: &str) -> String {
    format!("{}/registrations/{}", scope_id, registration_id)
}

fn check_policy_name(policy_name: &str) -> Result<()> {
    if policy_name.is_empty() {
        return Err(Error::InvalidInput("policy name must not be empty"));
    }
    Ok(())
}

/// Resource and expiry that together make up the string-to-sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInput {
    resource_uri: String,
    expiry: i64,
}

impl SigningInput {
    /// Expires `ttl_secs` from the current wall clock.
    pub fn new(resource_uri: &str, ttl_secs: i64) -> Result<Self> {
        SigningInput::expiring_in(resource_uri, ttl_secs, Utc::now())
    }

    /// Expires `ttl_secs` after `now`, truncated to whole seconds.
    pub fn expiring_in(resource_uri: &str, ttl_secs: i64, now: DateTime<Utc>) -> Result<Self> {
        if ttl_secs <= 0 {
            return Err(Error::InvalidInput("ttl must be a positive number of seconds"));
        }

        let expiry = now
            .timestamp()
            .checked_add(ttl_secs)
            .ok_or(Error::InvalidInput("ttl overflows the expiry timestamp"))?;

        SigningInput::at(resource_uri, expiry)
    }

    /// Expires at the given unix timestamp.
    pub fn at(resource_uri: &str, expiry: i64) -> Result<Self> {
        if resource_uri.is_empty() {
            return Err(Error::InvalidInput("resource uri must not be empty"));
        }

        Ok(SigningInput {
            resource_uri: resource_uri.to_owned(),
            expiry,
        })
    }

    pub fn resource_uri(&self) -> &str {
        &self.resource_uri
    }

    pub fn expiry(&self) -> i64 {
        self.expiry
    }

    pub fn string_to_sign(&self) -> String {
        format!("{}\n{}", quote_plus(&self.resource_uri), self.expiry)
    }
}

/// A signed token. Values are held decoded; `Display` renders the
/// `Authorization` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SasToken {
    resource_uri: String,
    signature: String,
    expiry: i64,
    policy_name: String,
}

impl SasToken {
    /// Signs `input` without reading the clock.
    pub fn sign(input: &SigningInput, key: &SigningKey, policy_name: &str) -> Result<Self> {
        check_policy_name(policy_name)?;

        let to_sign = input.string_to_sign();
        debug!(
            "signing {:?} for policy {}, expires at {}",
            to_sign, policy_name, input.expiry
        );

        let signature = STANDARD.encode(key.sign(&to_sign)?);

        Ok(SasToken {
            resource_uri: input.resource_uri.clone(),
            signature,
            expiry: input.expiry,
            policy_name: policy_name.to_owned(),
        })
    }

    pub fn resource_uri(&self) -> &str {
        &self.resource_uri
    }

    /// Base64 HMAC-SHA256, before URL encoding.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn signature_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.signature)
            .map_err(|_| Error::MalformedToken("signature is not valid base64"))
    }

    pub fn expiry(&self) -> i64 {
        self.expiry
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expiry, 0).single()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expiry
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    /// Recomputes the signature under `key`. A signature that is not base64
    /// simply fails verification.
    pub fn verify(&self, key: &SigningKey) -> Result<bool> {
        let input = SigningInput::at(&self.resource_uri, self.expiry)?;
        let signature = match self.signature_bytes() {
            Ok(signature) => signature,
            Err(_) => return Ok(false),
        };
        key.verify(&input.string_to_sign(), &signature)
    }
}

impl fmt::Display for SasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sr={}&sig={}&se={}&skn={}",
            SCHEME,
            quote_plus(&self.resource_uri),
            quote_plus(&self.signature),
            self.expiry,
            quote_plus(&self.policy_name)
        )
    }
}

impl FromStr for SasToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let query = s
            .trim()
            .strip_prefix(SCHEME)
            .and_then(|rest| rest.strip_prefix(' '))
            .ok_or(Error::MalformedToken("missing SharedAccessSignature scheme"))?;

        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|_| Error::MalformedToken("query is not form encoded"))?;

        let mut sr = None;
        let mut sig = None;
        let mut se = None;
        let mut skn = None;

        for (name, value) in pairs {
            let slot = match name.as_str() {
                "sr" => &mut sr,
                "sig" => &mut sig,
                "se" => &mut se,
                "skn" => &mut skn,
                _ => continue,
            };
            if slot.replace(value).is_some() {
                return Err(Error::MalformedToken("duplicate field"));
            }
        }

        let expiry = se
            .ok_or(Error::MalformedToken("missing se"))?
            .parse::<i64>()
            .map_err(|_| Error::MalformedToken("se is not an integer"))?;

        let resource_uri = sr.ok_or(Error::MalformedToken("missing sr"))?;
        if resource_uri.is_empty() {
            return Err(Error::MalformedToken("empty sr"));
        }

        let policy_name = skn.ok_or(Error::MalformedToken("missing skn"))?;
        if policy_name.is_empty() {
            return Err(Error::MalformedToken("empty skn"));
        }

        Ok(SasToken {
            resource_uri,
            signature: sig.ok_or(Error::MalformedToken("missing sig"))?,
            expiry,
            policy_name,
        })
    }
}

/// Signs a token expiring `ttl_secs` after `now`.
///
/// Arguments are checked before the key is decoded, so an empty resource
/// with a broken key reports `InvalidInput`.
pub fn generate_sas_token_at(
    resource_uri: &str,
    base64_key: &str,
    policy_name: &str,
    ttl_secs: i64,
    now: DateTime<Utc>,
) -> Result<SasToken> {
    let input = SigningInput::expiring_in(resource_uri, ttl_secs, now)?;
    check_policy_name(policy_name)?;

    let key = SigningKey::from_base64(base64_key)?;
    SasToken::sign(&input, &key, policy_name)
}

/// Returns the `Authorization` header value for `resource_uri`, valid for
/// `ttl_secs` from now.
pub fn generate_sas_token(
    resource_uri: &str,
    base64_key: &str,
    policy_name: &str,
    ttl_secs: i64,
) -> Result<String> {
    generate_sas_token_at(resource_uri, base64_key, policy_name, ttl_secs, Utc::now())
        .map(|token| token.to_string())
}

/// [`generate_sas_token`] with [`DEFAULT_TTL_SECS`].
pub fn generate_sas_token_default(
    resource_uri: &str,
    base64_key: &str,
    policy_name: &str,
) -> Result<String> {
    generate_sas_token(resource_uri, base64_key, policy_name, DEFAULT_TTL_SECS)
}
