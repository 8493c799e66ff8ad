use std::str::FromStr;

use knuffel::errors::DecodeError;
use smithay::input::pointer::CursorIcon;

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct ViewInfoConfig {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child, unwrap(argument), default = PickCursor::default())]
    pub pick_cursor: PickCursor,
    #[knuffel(child, unwrap(argument), default = GrabName::default())]
    pub grab_name: GrabName,
}

impl Default for ViewInfoConfig {
    fn default() -> Self {
        Self {
            off: false,
            pick_cursor: PickCursor::default(),
            grab_name: GrabName::default(),
        }
    }
}

/// Cursor icon shown while picking a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickCursor(pub CursorIcon);

impl Default for PickCursor {
    fn default() -> Self {
        Self(CursorIcon::Crosshair)
    }
}

/// Name of the per-output activation slot claimed while picking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabName(pub String);

impl Default for GrabName {
    fn default() -> Self {
        Self(String::from("wf-info"))
    }
}

fn check_no_type_name<S: knuffel::traits::ErrorSpan>(
    type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
    ctx: &mut knuffel::decode::Context<S>,
) {
    if let Some(type_name) = &type_name {
        ctx.emit_error(DecodeError::unexpected(
            type_name,
            "type name",
            "no type name expected for this node",
        ));
    }
}

impl<S: knuffel::traits::ErrorSpan> knuffel::DecodeScalar<S> for PickCursor {
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        check_no_type_name(type_name, ctx);
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<PickCursor, DecodeError<S>> {
        match &**val {
            knuffel::ast::Literal::String(ref s) => match CursorIcon::from_str(s) {
                Ok(icon) => Ok(Self(icon)),
                Err(_) => {
                    ctx.emit_error(DecodeError::conversion(
                        val,
                        format!("unknown cursor icon name: {s}"),
                    ));
                    Ok(Self::default())
                }
            },
            _ => {
                ctx.emit_error(DecodeError::unsupported(
                    val,
                    "cursor names must be strings",
                ));
                Ok(Self::default())
            }
        }
    }
}

impl<S: knuffel::traits::ErrorSpan> knuffel::DecodeScalar<S> for GrabName {
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        check_no_type_name(type_name, ctx);
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<GrabName, DecodeError<S>> {
        match &**val {
            knuffel::ast::Literal::String(ref s) if s.trim().is_empty() => {
                ctx.emit_error(DecodeError::unexpected(
                    val,
                    "grab name",
                    "grab name must not be empty",
                ));
                Ok(Self::default())
            }
            knuffel::ast::Literal::String(ref s) => Ok(Self(s.to_string())),
            _ => {
                ctx.emit_error(DecodeError::unsupported(
                    val,
                    "grab names must be strings",
                ));
                Ok(Self::default())
            }
        }
    }
}
