use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DelayError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DelayError::source_unavailable("x")
            .to_string()
            .contains("source unavailable:")
    );
    assert!(
        DelayError::sink_unavailable("x")
            .to_string()
            .contains("sink unavailable:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DelayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn io_errors_convert() {
    fn fails() -> DelayResult<()> {
        Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read"))?;
        Ok(())
    }
    assert!(matches!(fails(), Err(DelayError::Io(_))));
}
