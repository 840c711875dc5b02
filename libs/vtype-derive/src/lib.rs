use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Ident, LitStr, parse_macro_input};

/// Derive macro that makes a custom type a conversion destination.
///
/// Generates `vtype::Value` and a depth-0 `vtype::resolve::Handle` impl. The
/// conversion strategy comes from the hooks listed in `#[vtype(...)]`; when
/// several are listed the strongest wins: `text_codec` > `setter` >
/// `callback`. With no hook the type is unsupported and conversions into it
/// fail without touching it.
///
/// - `text_codec`: type implements `vtype::TextCodec`
/// - `setter`: type implements `vtype::Setter`
/// - `callback`: type implements `vtype::Callback`
/// - `name = "..."`: display name for help output
/// - `default_text = "method"`: `fn method(&self) -> String` used as the
///   help default instead of rendering the value
/// - `no_default`: type has no `Default`; empty `Option` layers around it
///   cannot be filled
///
/// # Example
///
/// ```ignore
/// #[derive(vtype::Value, Default)]
/// #[vtype(setter, name = "host:port")]
/// pub struct Endpoint {
///     host: String,
///     port: u16,
/// }
/// ```
#[proc_macro_derive(Value, attributes(vtype))]
pub fn derive_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Hook {
    Callback,
    Setter,
    TextCodec,
}

#[derive(Default)]
struct Options {
    hook: Option<Hook>,
    name: Option<LitStr>,
    default_text: Option<Ident>,
    no_default: bool,
}

impl Options {
    fn declare(&mut self, hook: Hook) {
        self.hook = self.hook.max(Some(hook));
    }
}

fn parse_options(input: &DeriveInput) -> Result<Options, syn::Error> {
    let mut options = Options::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("vtype") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("text_codec") {
                options.declare(Hook::TextCodec);
            } else if meta.path.is_ident("setter") {
                options.declare(Hook::Setter);
            } else if meta.path.is_ident("callback") {
                options.declare(Hook::Callback);
            } else if meta.path.is_ident("name") {
                options.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("default_text") {
                let method: LitStr = meta.value()?.parse()?;
                options.default_text = Some(method.parse()?);
            } else if meta.path.is_ident("no_default") {
                options.no_default = true;
            } else {
                return Err(meta.error("unknown vtype attribute"));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    if let syn::Data::Union(_) = &input.data {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Value cannot be derived for unions",
        ));
    }

    let options = parse_options(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (target, source) = match options.hook {
        Some(Hook::TextCodec) => (
            quote! { ::vtype::capability::Target::TextCodec(self) },
            quote! { ::vtype::capability::Source::TextCodec(self) },
        ),
        Some(Hook::Setter) => (
            quote! { ::vtype::capability::Target::Setter(self) },
            quote! { ::vtype::capability::Source::Setter(self) },
        ),
        Some(Hook::Callback) => (
            quote! { ::vtype::capability::Target::Callback(self) },
            quote! { ::vtype::capability::Source::Callback(self) },
        ),
        None => (
            quote! { ::vtype::capability::Target::Unsupported },
            quote! { ::vtype::capability::Source::Unsupported },
        ),
    };

    let type_name = options.name.as_ref().map(|lit| {
        quote! {
            fn type_name(&self) -> ::std::option::Option<::std::borrow::Cow<'static, str>> {
                ::std::option::Option::Some(::std::borrow::Cow::Borrowed(#lit))
            }
        }
    });

    let default_text = options.default_text.as_ref().map(|method| {
        quote! {
            fn default_text(&self) -> ::std::option::Option<::std::string::String> {
                ::std::option::Option::Some(self.#method())
            }
        }
    });

    let materialize = (!options.no_default).then(|| {
        quote! {
            fn materialize() -> ::std::option::Option<Self> {
                ::std::option::Option::Some(::std::default::Default::default())
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::vtype::capability::Value for #name #ty_generics #where_clause {
            fn target(&mut self) -> ::vtype::capability::Target<'_> {
                #target
            }

            fn source(&self) -> ::vtype::capability::Source<'_> {
                #source
            }

            #type_name
            #default_text
            #materialize
        }

        impl #impl_generics ::vtype::resolve::Handle for #name #ty_generics #where_clause {
            type Terminal = Self;

            const DEPTH: usize = 0;

            fn resolve_into<'__vt>(
                &'__vt mut self,
                _chain: &mut ::vtype::resolve::Chain,
            ) -> ::vtype::resolve::Slot<'__vt, Self> {
                ::vtype::resolve::Slot::Occupied(self)
            }

            fn resolve_ref(&self) -> ::std::option::Option<&Self> {
                ::std::option::Option::Some(self)
            }

            fn wrap(terminal: Self) -> Self {
                terminal
            }
        }
    })
}
