use proc_macro::TokenStream;
use proc_macro2::Literal;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned};

/// Register the default emptiness encoding of a type
///
/// Without attributes, structs get a separate flag and field-less enums
/// with a primitive `repr` get a spare discriminant as sentinel.
///
/// Attributes:
///  - `#[tinyopt(manipulator = M)]`: use the flag manipulator `M`
///  - `#[tinyopt(separate)]`: always use a separate flag
///  - `#[tinyopt(sentinel = N)]`: on enums, the discriminant that marks
///    the enum empty
#[proc_macro_derive(Payload, attributes(tinyopt))]
pub fn derive_payload(item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as syn::DeriveInput);
    match payload(&item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Generate field designators for use with `tinyopt::Field`
///
/// For a struct `MyStruct`, this creates a module `my_struct_fields` with
/// one zero-sized type per field, named like the field.
#[proc_macro_derive(Fields)]
pub fn derive_fields(item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as syn::DeriveInput);
    match fields(&item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

#[derive(Default)]
struct PayloadArgs {
    manipulator: Option<syn::Type>,
    separate: bool,
    sentinel: Option<(i128, proc_macro2::Span)>,
}

impl PayloadArgs {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut args = Self::default();
        for attr in attrs {
            if !attr.path().is_ident("tinyopt") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("manipulator") {
                    args.manipulator = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("separate") {
                    args.separate = true;
                    Ok(())
                } else if meta.path.is_ident("sentinel") {
                    let expr: syn::Expr = meta.value()?.parse()?;
                    let value = int_literal(&expr).ok_or_else(|| {
                        syn::Error::new(
                            expr.span(),
                            "sentinel must be an integer literal",
                        )
                    })?;
                    args.sentinel = Some((value, expr.span()));
                    Ok(())
                } else {
                    Err(meta.error("unsupported tinyopt attribute"))
                }
            })?;
        }

        if args.manipulator.is_some() && args.separate {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "`manipulator` and `separate` exclude each other",
            ));
        }

        Ok(args)
    }
}

fn payload(item: &syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let args = PayloadArgs::parse(&item.attrs)?;
    let ident = &item.ident;
    let (impl_generics, ty_generics, where_clause) =
        item.generics.split_for_impl();

    if let Some(manipulator) = &args.manipulator {
        return Ok(quote!(
            impl #impl_generics tinyopt::Payload for #ident #ty_generics
            #where_clause
            {
                type Manipulator = #manipulator;
                type Representation = tinyopt::InPlace<Self, #manipulator>;
            }
        ));
    }

    let separate = quote!(
        impl #impl_generics tinyopt::Payload for #ident #ty_generics
        #where_clause
        {
            type Manipulator = tinyopt::Unregistered;
            type Representation = tinyopt::Separate<Self>;
        }
    );

    if args.separate {
        return Ok(separate);
    }

    let syn::Data::Enum(data) = &item.data else {
        if let Some((_, span)) = args.sentinel {
            return Err(syn::Error::new(
                span,
                "a sentinel can only be given for enums; use \
                 `tinyopt::Sentinel` or `tinyopt::Field` for other types",
            ));
        }
        return Ok(separate);
    };

    let Some(repr) = IntRepr::find(&item.attrs)? else {
        return Err(syn::Error::new(
            ident.span(),
            "enums need a primitive `repr`, like `#[repr(u8)]`, to hide \
             their emptiness flag; add `#[tinyopt(separate)]` otherwise",
        ));
    };

    let discriminants = discriminants(data)?;
    let sentinel = match args.sentinel {
        Some((value, span)) => {
            if value < repr.min || value > repr.max {
                return Err(syn::Error::new(
                    span,
                    format!(
                        "sentinel value is outside the representable range \
                         of `{}`",
                        repr.ident
                    ),
                ));
            }
            if discriminants.contains(&Some(value)) {
                return Err(syn::Error::new(
                    span,
                    "sentinel is the discriminant of a variant",
                ));
            }
            value
        }
        None => spare_discriminant(&repr, &discriminants, ident)?,
    };

    let repr_ident = &repr.ident;
    let sentinel = signed_literal(sentinel);

    // Discriminants that are not literals are only known to the compiler
    let variants = data.variants.iter().map(|v| &v.ident);

    Ok(quote!(
        const _: () = {
            #(
                assert!(
                    #ident::#variants as #repr_ident != #sentinel,
                    "{}",
                    tinyopt::diagnostics::ENUM_SENTINEL_TAKEN
                );
            )*
        };

        unsafe impl tinyopt::BoundedEnum for #ident {
            type Repr = #repr_ident;
            const SENTINEL: #repr_ident = #sentinel;
        }

        impl tinyopt::Payload for #ident {
            type Manipulator = tinyopt::EnumSentinel;
            type Representation =
                tinyopt::InPlace<Self, tinyopt::EnumSentinel>;
        }
    ))
}

struct IntRepr {
    ident: syn::Ident,
    min: i128,
    max: i128,
}

impl IntRepr {
    fn find(attrs: &[syn::Attribute]) -> syn::Result<Option<Self>> {
        let mut found = None;
        for attr in attrs {
            if !attr.path().is_ident("repr") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if let Some(ident) = meta.path.get_ident() {
                    if let Some((min, max)) = int_range(&ident.to_string()) {
                        found = Some(IntRepr {
                            ident: ident.clone(),
                            min,
                            max,
                        });
                    }
                }
                // Skip arguments of `align(..)` and friends
                if meta.input.peek(syn::token::Paren) {
                    let _content;
                    syn::parenthesized!(_content in meta.input);
                }
                Ok(())
            })?;
        }
        Ok(found)
    }
}

// `usize` and `isize` are assumed to be 64 bits wide; the generated
// constant fails to compile on smaller targets if that matters.
fn int_range(name: &str) -> Option<(i128, i128)> {
    Some(match name {
        "u8" => (0, u8::MAX as i128),
        "u16" => (0, u16::MAX as i128),
        "u32" => (0, u32::MAX as i128),
        "u64" | "usize" => (0, u64::MAX as i128),
        "i8" => (i8::MIN as i128, i8::MAX as i128),
        "i16" => (i16::MIN as i128, i16::MAX as i128),
        "i32" => (i32::MIN as i128, i32::MAX as i128),
        "i64" | "isize" => (i64::MIN as i128, i64::MAX as i128),
        _ => return None,
    })
}

/// Discriminant of every variant, `None` where it is not a literal
fn discriminants(data: &syn::DataEnum) -> syn::Result<Vec<Option<i128>>> {
    let mut next = Some(0i128);
    let mut values = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "only field-less enums can hide their emptiness flag in the \
                 discriminant; add `#[tinyopt(separate)]` to use a separate \
                 flag",
            ));
        }
        let value = match &variant.discriminant {
            Some((_, expr)) => int_literal(expr),
            None => next,
        };
        values.push(value);
        next = value.and_then(|v| v.checked_add(1));
    }
    Ok(values)
}

fn spare_discriminant(
    repr: &IntRepr,
    discriminants: &[Option<i128>],
    ident: &syn::Ident,
) -> syn::Result<i128> {
    if discriminants.iter().any(Option::is_none) {
        return Err(syn::Error::new(
            ident.span(),
            "cannot determine an unused discriminant because not all \
             discriminants are integer literals; give one with \
             `#[tinyopt(sentinel = ...)]`",
        ));
    }
    let known = discriminants.iter().flatten().copied();
    let max = known.clone().max().unwrap_or(-1);
    let min = known.min().unwrap_or(0);

    if max < repr.max {
        Ok(max + 1)
    } else if min > repr.min {
        Ok(min - 1)
    } else {
        Err(syn::Error::new(
            ident.span(),
            format!(
                "no unused discriminant left within `{}`; pick a sentinel \
                 with `#[tinyopt(sentinel = ...)]` or use a wider repr",
                repr.ident
            ),
        ))
    }
}

fn int_literal(expr: &syn::Expr) -> Option<i128> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(int),
            ..
        }) => int.base10_parse().ok(),
        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr,
            ..
        }) => int_literal(expr).and_then(i128::checked_neg),
        syn::Expr::Group(group) => int_literal(&group.expr),
        syn::Expr::Paren(paren) => int_literal(&paren.expr),
        _ => None,
    }
}

fn signed_literal(value: i128) -> proc_macro2::TokenStream {
    let abs = Literal::u128_unsuffixed(value.unsigned_abs());
    if value < 0 {
        quote!(-#abs)
    } else {
        quote!(#abs)
    }
}

fn fields(item: &syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &item.ident;

    let syn::Data::Struct(s) = &item.data else {
        return Err(syn::Error::new(
            struct_name.span(),
            "field designators can only be derived for structs",
        ));
    };

    let syn::Fields::Named(named) = &s.fields else {
        return Err(syn::Error::new(
            struct_name.span(),
            "field designators need named fields",
        ));
    };

    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "field designators cannot be derived for generic structs",
        ));
    }

    if is_packed(&item.attrs)? {
        return Err(syn::Error::new(
            struct_name.span(),
            "fields of packed structs may be unaligned and cannot hold an \
             emptiness flag",
        ));
    }

    let vis = &item.vis;
    let module = format_ident!("{}_fields", snake_case(&struct_name.to_string()));

    let mut designators = Vec::new();
    let mut impls = Vec::new();
    for f in &named.named {
        let Some(field_name) = &f.ident else {
            continue;
        };
        let field_ty = &f.ty;
        let docstring = gather_docstring(&f.attrs)?;
        let summary =
            format!("Designates `{struct_name}::{field_name}`\n\n{docstring}");

        designators.push(quote!(
            #[doc = #summary]
            pub struct #field_name;
        ));

        impls.push(quote!(
            unsafe impl tinyopt::FieldOf<#struct_name> for #module::#field_name {
                type Type = #field_ty;
                const OFFSET: usize =
                    ::core::mem::offset_of!(#struct_name, #field_name);
                const NAME: &'static str = stringify!(#field_name);
            }
        ));
    }

    let module_doc = format!("Field designators of `{struct_name}`");

    Ok(quote!(
        #[doc = #module_doc]
        #[allow(non_camel_case_types, dead_code)]
        #vis mod #module {
            #(#designators)*
        }

        #(#impls)*
    ))
}

fn is_packed(attrs: &[syn::Attribute]) -> syn::Result<bool> {
    let mut packed = false;
    for attr in attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("packed") {
                packed = true;
            }
            if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        })?;
    }
    Ok(packed)
}

fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && !chars[i - 1].is_uppercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if i > 0
                && chars[i - 1] != '_'
                && (prev_lower || (prev_upper && next_lower))
            {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn gather_docstring(attrs: &[syn::Attribute]) -> syn::Result<String> {
    let mut docstring = String::new();

    for attr in attrs {
        if attr.path().is_ident("doc") {
            let syn::Meta::NameValue(name_value) = &attr.meta else {
                return Err(syn::Error::new(
                    attr.span(),
                    "doc attribute must be a name and a value",
                ));
            };
            let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(litstr),
                ..
            }) = &name_value.value
            else {
                return Err(syn::Error::new(
                    attr.span(),
                    "argument to doc attribute must be a string literal",
                ));
            };
            docstring.push_str(litstr.value().trim());
            docstring.push('\n');
        }
    }

    Ok(docstring)
}
