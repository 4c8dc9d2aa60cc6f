//! Structural checks on plugin responses.
//!
//! Every violation maps to [`PluginError::NotCompliant`]. A plugin that
//! reports a failure through the protocol is not affected by these checks.

use std::collections::HashSet;

use crate::proto::{
    Capability, Command, DescribeKeyRequest, DescribeKeyResponse, GenerateEnvelopeRequest,
    GenerateEnvelopeResponse, GenerateSignatureRequest, GenerateSignatureResponse,
    PluginMetadata, VerifySignatureRequest, VerifySignatureResponse,
};
use crate::{PluginError, PluginResult};

/// Checks that every required metadata field is present.
///
/// # Errors
///
/// Returns a compliance error naming the first missing field.
pub fn validate_metadata(metadata: &PluginMetadata) -> PluginResult<()> {
    let required = [
        ("name", &metadata.name),
        ("description", &metadata.description),
        ("version", &metadata.version),
        ("url", &metadata.url),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(PluginError::not_compliant(format!(
                "metadata field `{field}` is empty"
            )));
        }
    }

    if metadata.capabilities.is_empty() {
        return Err(PluginError::not_compliant(
            "metadata declares no capabilities",
        ));
    }
    if metadata.supported_contract_versions.is_empty() {
        return Err(PluginError::not_compliant(
            "metadata declares no supported contract versions",
        ));
    }

    Ok(())
}

/// Checks that the declared name matches the name the plugin was resolved by.
///
/// # Errors
///
/// Returns a compliance error on mismatch.
pub fn validate_metadata_name(metadata: &PluginMetadata, expected: &str) -> PluginResult<()> {
    if metadata.name == expected {
        Ok(())
    } else {
        Err(PluginError::not_compliant(format!(
            "plugin declares name `{}` but is installed as `{expected}`",
            metadata.name
        )))
    }
}

/// Checks that the plugin declares the capability behind `command`.
///
/// # Errors
///
/// Returns [`PluginError::UnsupportedCapability`] if it does not.
pub fn require_capability(metadata: &PluginMetadata, command: Command) -> PluginResult<()> {
    match command.required_capability() {
        Some(capability) if !metadata.has_capability(&capability) => {
            Err(PluginError::UnsupportedCapability { capability })
        }
        _ => Ok(()),
    }
}

/// # Errors
///
/// Returns a compliance error if the response describes a different key.
pub fn validate_describe_key(
    req: &DescribeKeyRequest,
    resp: &DescribeKeyResponse,
) -> PluginResult<()> {
    ensure_same_key(&req.key_id, &resp.key_id)
}

/// # Errors
///
/// Returns a compliance error if the signature, algorithm, or chain does not
/// fit the request.
pub fn validate_generate_signature(
    req: &GenerateSignatureRequest,
    resp: &GenerateSignatureResponse,
) -> PluginResult<()> {
    ensure_same_key(&req.key_id, &resp.key_id)?;

    if resp.signature.is_empty() {
        return Err(PluginError::not_compliant("signature is empty"));
    }
    let expected = req.key_spec.signature_algorithm();
    if resp.signing_algorithm != expected {
        return Err(PluginError::not_compliant(format!(
            "signing algorithm {:?} does not match key spec {:?}",
            resp.signing_algorithm, req.key_spec
        )));
    }
    if resp.certificate_chain.is_empty() {
        return Err(PluginError::not_compliant("certificate chain is empty"));
    }

    Ok(())
}

/// # Errors
///
/// Returns a compliance error if the envelope is empty or of the wrong type.
pub fn validate_generate_envelope(
    req: &GenerateEnvelopeRequest,
    resp: &GenerateEnvelopeResponse,
) -> PluginResult<()> {
    if resp.signature_envelope.is_empty() {
        return Err(PluginError::not_compliant("signature envelope is empty"));
    }
    if resp.signature_envelope_type != req.signature_envelope_type {
        return Err(PluginError::not_compliant(format!(
            "envelope type `{}` does not match requested `{}`",
            resp.signature_envelope_type, req.signature_envelope_type
        )));
    }
    Ok(())
}

/// Checks that the plugin only reports on what it was asked to verify.
///
/// Empty results are valid: the plugin verified nothing.
///
/// # Errors
///
/// Returns a compliance error for a result on an unrequested capability or
/// a processed attribute the host did not hand over.
pub fn validate_verify_signature(
    req: &VerifySignatureRequest,
    resp: &VerifySignatureResponse,
) -> PluginResult<()> {
    let requested: HashSet<&Capability> = req.trust_policy.signature_verification.iter().collect();
    if let Some(extra) = resp
        .verification_results
        .keys()
        .find(|capability| !requested.contains(capability))
    {
        return Err(PluginError::not_compliant(format!(
            "verification result for unrequested capability {extra}"
        )));
    }

    let unprocessed: HashSet<&str> = req
        .signature
        .unprocessed_attributes
        .iter()
        .map(String::as_str)
        .collect();
    if let Some(attr) = resp
        .processed_attributes
        .iter()
        .find(|attr| !unprocessed.contains(attr.as_str()))
    {
        return Err(PluginError::not_compliant(format!(
            "processed attribute `{attr}` was not handed to the plugin"
        )));
    }

    Ok(())
}

fn ensure_same_key(requested: &str, returned: &str) -> PluginResult<()> {
    if requested == returned {
        Ok(())
    } else {
        Err(PluginError::not_compliant(format!(
            "response key `{returned}` does not match requested key `{requested}`"
        )))
    }
}
