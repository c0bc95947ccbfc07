//! Exit status for maasctl

use maasclient::MaasError;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when MAAS answers with an error status or unparseable body
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the MAAS server is unreachable
pub const EXIT_MAAS_UNAVAILABLE: i32 = 70;

/// Map a failed run to its exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.chain().find_map(|cause| cause.downcast_ref::<MaasError>()) {
        Some(e) if e.is_unreachable() => EXIT_MAAS_UNAVAILABLE,
        Some(e) if e.is_invalid_response() => EXIT_INVALID_RESPONSE,
        _ => EXIT_GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        let unreachable = anyhow::Error::new(MaasError::Timeout(30));
        assert_eq!(exit_code_for(&unreachable), EXIT_MAAS_UNAVAILABLE);

        let invalid: anyhow::Result<()> =
            Err(MaasError::InvalidJson("eof".into())).context("Failed to list nodes");
        assert_eq!(exit_code_for(&invalid.unwrap_err()), EXIT_INVALID_RESPONSE);

        let other = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&other), EXIT_GENERAL_ERROR);
    }
}
