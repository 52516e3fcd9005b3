use sha2::{Digest, Sha256};
use syn::LitStr;

/// Validate a signature literal and hash it to its four-byte code.
pub(crate) fn code(lit: &LitStr) -> syn::Result<[u8; 4]> {
    let signature = lit.value();
    check(&signature).map_err(|why| {
        syn::Error::new(lit.span(), format!("invalid signature `{signature}`: {why}"))
    })?;
    let digest = Sha256::digest(signature.as_bytes());
    Ok([digest[0], digest[1], digest[2], digest[3]])
}

// Must agree with `OperationCode::of` in switchyard-core.
fn check(signature: &str) -> Result<(), &'static str> {
    let open = signature.find('(').ok_or("missing `(`")?;
    if !signature.ends_with(')') {
        return Err("must end with `)`");
    }
    let mut name = signature[..open].chars();
    match name.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return Err("name must start with a letter or `_`"),
    }
    if !name.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("name must be alphanumeric");
    }
    if signature.chars().any(char::is_whitespace) {
        return Err("whitespace is not canonical");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_what_core_rejects() {
        assert!(check("owner").is_err());
        assert!(check("owner(").is_err());
        assert!(check("9owner()").is_err());
        assert!(check("owner(address, uint256)").is_err());
        assert!(check("owner()").is_ok());
        assert!(check("cut((address,uint8,bytes4[])[],address,bytes)").is_ok());
    }
}
