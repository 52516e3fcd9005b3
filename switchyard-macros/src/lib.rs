use proc_macro::TokenStream;
use quote::quote;
use syn::{LitStr, Token, parse::Parser, parse_macro_input, punctuated::Punctuated};

mod signature;

/// Compile-time operation code of a canonical signature.
///
/// ```ignore
/// const CUT: OperationCode = selector!("cut((address,uint8,bytes4[])[],address,bytes)");
/// ```
///
/// Expands to `::switchyard_core::OperationCode::from_bytes([..])`, so it can
/// be used in `const` position.
#[proc_macro]
pub fn selector(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);
    match signature::code(&lit) {
        Ok(bytes) => {
            let [a, b, c, d] = bytes;
            quote! {
                ::switchyard_core::OperationCode::from_bytes([#a, #b, #c, #d])
            }
            .into()
        }
        Err(err) => err.to_compile_error().into(),
    }
}

/// Compile-time capability id of a group of operations: the XOR of their
/// operation codes.
///
/// ```ignore
/// const OWNERSHIP: CapabilityId =
///     capability!("currentPrincipal()", "transferPrincipal(address)");
/// ```
#[proc_macro]
pub fn capability(input: TokenStream) -> TokenStream {
    let parser = Punctuated::<LitStr, Token![,]>::parse_terminated;
    let sigs = match parser.parse(input) {
        Ok(sigs) => sigs,
        Err(err) => return err.to_compile_error().into(),
    };
    if sigs.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "capability! needs at least one signature",
        )
        .to_compile_error()
        .into();
    }

    let mut acc = [0u8; 4];
    for lit in &sigs {
        match signature::code(lit) {
            Ok(bytes) => {
                for (a, b) in acc.iter_mut().zip(bytes) {
                    *a ^= b;
                }
            }
            Err(err) => return err.to_compile_error().into(),
        }
    }

    let [a, b, c, d] = acc;
    quote! {
        ::switchyard_core::CapabilityId::from_bytes([#a, #b, #c, #d])
    }
    .into()
}
