use std::sync::Arc;

use crate::data::variant::Variant;
use crate::effects::decl::{BoxArea, EffectDeclaration};
use crate::effects::instancer::{
    Decorator, DecoratorData, EffectInstancers, EffectsElement, Filter,
};
use crate::foundation::core::{Colourb, Rect, Vec2};
use crate::foundation::error::{StyleError, StyleResult};
use crate::foundation::ids::PropertyId;
use crate::render::interface::{
    CompiledFilterHandle, CompiledGeometryHandle, FilterParameters, Mesh,
};
use crate::render::manager::RenderManager;
use crate::style::color::parse_colour;
use crate::style::parsers::{NumberParser, ParameterMap, PropertyParser};
use crate::style::property::Unit;

/// Blur reaches this many standard deviations before it is visually zero.
const BLUR_EXTENT_SIGMAS: f64 = 3.0;

pub(crate) fn register_builtins(instancers: &mut EffectInstancers) {
    instancers.register_decorator("solid", |declaration| {
        Ok(Arc::new(SolidDecorator::from_declaration(declaration)?))
    });
    instancers.register_filter("opacity", |declaration| {
        Ok(Arc::new(OpacityFilter::from_declaration(declaration)?))
    });
    instancers.register_filter("blur", |declaration| {
        Ok(Arc::new(BlurFilter::from_declaration(declaration)?))
    });
    instancers.register_filter("drop-shadow", |declaration| {
        Ok(Arc::new(DropShadowFilter::from_declaration(declaration)?))
    });
}

fn arity_error(declaration: &EffectDeclaration, expected: &str) -> StyleError {
    StyleError::instancing(format!(
        "'{}' expects {expected}, got {} argument(s)",
        declaration.name,
        declaration.args.len()
    ))
}

fn parse_length_px(arg: &str) -> Option<f32> {
    NumberParser::new(Unit::PX, Unit::PX)
        .parse_value(arg, &ParameterMap::new())
        .and_then(|p| p.as_number())
}

/// `0.5` or `50%`.
fn parse_fraction(arg: &str) -> Option<f32> {
    let p = NumberParser::new(Unit::NUMBER | Unit::PERCENT, Unit::empty())
        .parse_value(arg, &ParameterMap::new())?;
    let v = p.as_number()?;
    Some(if p.unit == Unit::PERCENT { v / 100.0 } else { v })
}

/// Fills its paint area with one colour: `solid(<colour>)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidDecorator {
    pub colour: Colourb,
}

impl SolidDecorator {
    pub fn from_declaration(declaration: &EffectDeclaration) -> StyleResult<Self> {
        let [arg] = declaration.args.as_slice() else {
            return Err(arity_error(declaration, "one colour"));
        };
        let colour = parse_colour(arg).map_err(StyleError::instancing)?;
        Ok(Self { colour })
    }
}

impl Decorator for SolidDecorator {
    fn generate_element_data(
        &self,
        element: &dyn EffectsElement,
        paint_area: BoxArea,
        render: &mut RenderManager,
    ) -> Option<DecoratorData> {
        let opacity = element
            .property(PropertyId::OPACITY)
            .and_then(|p| p.as_number())
            .unwrap_or(1.0);
        let colour = self.colour.with_opacity(opacity).to_premultiplied();

        let mut mesh = Mesh::new();
        mesh.push_rect(element.box_rect(paint_area), colour);
        let geometry = render.compile_geometry(&mesh)?;
        Some(Box::new(geometry))
    }

    fn render_element(
        &self,
        element: &dyn EffectsElement,
        data: &DecoratorData,
        render: &mut RenderManager,
    ) {
        if let Some(&geometry) = data.downcast_ref::<CompiledGeometryHandle>() {
            render.render_geometry(geometry, element.absolute_offset(), None);
        }
    }

    fn release_element_data(&self, data: DecoratorData, render: &mut RenderManager) {
        if let Ok(geometry) = data.downcast::<CompiledGeometryHandle>() {
            render.release_geometry(*geometry);
        }
    }
}

/// `opacity(<number | percentage>)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityFilter {
    pub value: f32,
}

impl OpacityFilter {
    pub fn from_declaration(declaration: &EffectDeclaration) -> StyleResult<Self> {
        let value = match declaration.args.as_slice() {
            [] => 1.0,
            [arg] => parse_fraction(arg).ok_or_else(|| {
                StyleError::instancing(format!("invalid opacity '{arg}'"))
            })?,
            _ => return Err(arity_error(declaration, "at most one value")),
        };
        Ok(Self {
            value: value.clamp(0.0, 1.0),
        })
    }
}

impl Filter for OpacityFilter {
    fn compile(
        &self,
        _element: &dyn EffectsElement,
        render: &mut RenderManager,
    ) -> Option<CompiledFilterHandle> {
        let mut params = FilterParameters::new();
        params.insert("value".to_owned(), Variant::from(self.value));
        render.compile_filter("opacity", &params)
    }
}

/// Gaussian blur, `blur(<length>)` where the length is the standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurFilter {
    pub sigma: f32,
}

impl BlurFilter {
    pub fn from_declaration(declaration: &EffectDeclaration) -> StyleResult<Self> {
        let sigma = match declaration.args.as_slice() {
            [] => 0.0,
            [arg] => parse_length_px(arg)
                .ok_or_else(|| StyleError::instancing(format!("invalid blur radius '{arg}'")))?,
            _ => return Err(arity_error(declaration, "at most one length")),
        };
        if sigma < 0.0 {
            return Err(StyleError::instancing("blur radius must not be negative"));
        }
        Ok(Self { sigma })
    }
}

impl Filter for BlurFilter {
    fn compile(
        &self,
        _element: &dyn EffectsElement,
        render: &mut RenderManager,
    ) -> Option<CompiledFilterHandle> {
        let mut params = FilterParameters::new();
        params.insert("sigma".to_owned(), Variant::from(self.sigma));
        render.compile_filter("blur", &params)
    }

    fn extend_ink_overflow(&self, _element: &dyn EffectsElement, region: &mut Rect) {
        *region = region.inflate(
            BLUR_EXTENT_SIGMAS * f64::from(self.sigma),
            BLUR_EXTENT_SIGMAS * f64::from(self.sigma),
        );
    }
}

/// `drop-shadow(<colour> <offset-x> <offset-y> [<blur-radius>])`; the colour may come first or last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadowFilter {
    pub colour: Colourb,
    pub offset: Vec2,
    pub sigma: f32,
}

impl DropShadowFilter {
    pub fn from_declaration(declaration: &EffectDeclaration) -> StyleResult<Self> {
        let mut colour = Colourb::black();
        let mut lengths = Vec::with_capacity(3);
        for (i, arg) in declaration.args.iter().enumerate() {
            if let Some(px) = parse_length_px(arg) {
                lengths.push(px);
                continue;
            }
            let is_edge = i == 0 || i + 1 == declaration.args.len();
            match parse_colour(arg) {
                Ok(c) if is_edge => colour = c,
                _ => {
                    return Err(StyleError::instancing(format!(
                        "invalid drop-shadow argument '{arg}'"
                    )));
                }
            }
        }

        let (x, y, radius) = match lengths.as_slice() {
            [x, y] => (*x, *y, 0.0),
            [x, y, r] => (*x, *y, *r),
            _ => return Err(arity_error(declaration, "two or three lengths")),
        };
        if radius < 0.0 {
            return Err(StyleError::instancing(
                "shadow blur radius must not be negative",
            ));
        }

        Ok(Self {
            colour,
            offset: Vec2::new(f64::from(x), f64::from(y)),
            // Shadow blur radius is twice the standard deviation.
            sigma: radius * 0.5,
        })
    }
}

impl Filter for DropShadowFilter {
    fn compile(
        &self,
        _element: &dyn EffectsElement,
        render: &mut RenderManager,
    ) -> Option<CompiledFilterHandle> {
        let c = self.colour.to_premultiplied();
        let rgba = [c.r, c.g, c.b, c.a].map(i32::from);
        let mut params = FilterParameters::new();
        params.insert("color".to_owned(), Variant::from(rgba.to_vec()));
        params.insert(
            "offset".to_owned(),
            Variant::from(vec![self.offset.x, self.offset.y]),
        );
        params.insert("sigma".to_owned(), Variant::from(self.sigma));
        render.compile_filter("drop-shadow", &params)
    }

    fn extend_ink_overflow(&self, _element: &dyn EffectsElement, region: &mut Rect) {
        let extent = BLUR_EXTENT_SIGMAS * f64::from(self.sigma);
        let shadow = region.inflate(extent, extent) + self.offset;
        *region = region.union(shadow);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/builtin.rs"]
mod tests;
