use crate::foundation::core::Colourb;

const NAMED_COLOURS: &[(&str, Colourb)] = &[
    ("black", Colourb::new(0, 0, 0, 255)),
    ("silver", Colourb::new(192, 192, 192, 255)),
    ("gray", Colourb::new(128, 128, 128, 255)),
    ("grey", Colourb::new(128, 128, 128, 255)),
    ("white", Colourb::new(255, 255, 255, 255)),
    ("maroon", Colourb::new(128, 0, 0, 255)),
    ("red", Colourb::new(255, 0, 0, 255)),
    ("orange", Colourb::new(255, 165, 0, 255)),
    ("purple", Colourb::new(128, 0, 128, 255)),
    ("fuchsia", Colourb::new(255, 0, 255, 255)),
    ("green", Colourb::new(0, 128, 0, 255)),
    ("lime", Colourb::new(0, 255, 0, 255)),
    ("olive", Colourb::new(128, 128, 0, 255)),
    ("yellow", Colourb::new(255, 255, 0, 255)),
    ("navy", Colourb::new(0, 0, 128, 255)),
    ("blue", Colourb::new(0, 0, 255, 255)),
    ("teal", Colourb::new(0, 128, 128, 255)),
    ("aqua", Colourb::new(0, 255, 255, 255)),
    ("transparent", Colourb::new(0, 0, 0, 0)),
];

/// Parses `#rgb[a]`, `#rrggbb[aa]`, `rgb()/rgba()`, `hsl()/hsla()` and HTML colour names.
pub fn parse_colour(value: &str) -> Result<Colourb, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("empty colour".to_owned());
    }
    let lower = value.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }
    if lower.starts_with("rgb") {
        return parse_rgb(&lower);
    }
    if lower.starts_with("hsl") {
        return parse_hsl(&lower);
    }

    NAMED_COLOURS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| *c)
        .ok_or_else(|| format!("unknown colour \"{value}\""))
}

fn parse_hex(s: &str) -> Result<Colourb, String> {
    fn nibble(c: u8) -> Result<u8, String> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| format!("invalid hex digit '{}'", c as char))
    }

    let b = s.as_bytes();
    let channel = |hi: u8, lo: u8| -> Result<u8, String> { Ok(nibble(hi)? * 16 + nibble(lo)?) };

    match b.len() {
        3 | 4 => {
            let a = if b.len() == 4 { channel(b[3], b[3])? } else { 255 };
            Ok(Colourb::new(
                channel(b[0], b[0])?,
                channel(b[1], b[1])?,
                channel(b[2], b[2])?,
                a,
            ))
        }
        6 | 8 => {
            let a = if b.len() == 8 { channel(b[6], b[7])? } else { 255 };
            Ok(Colourb::new(
                channel(b[0], b[1])?,
                channel(b[2], b[3])?,
                channel(b[4], b[5])?,
                a,
            ))
        }
        _ => Err("expected #RGB, #RGBA, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

/// Splits the comma separated arguments of `name(a, b, c)`.
fn function_args<'a>(value: &'a str, name_len: usize) -> Result<Vec<&'a str>, String> {
    let inner = value
        .get(name_len..)
        .and_then(|rest| rest.trim_start().strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| format!("malformed colour function \"{value}\""))?;
    Ok(inner.split(',').map(str::trim).collect())
}

fn parse_rgb(value: &str) -> Result<Colourb, String> {
    let has_alpha = value.as_bytes().get(3) == Some(&b'a');
    let args = function_args(value, if has_alpha { 4 } else { 3 })?;
    let expected = if has_alpha { 4 } else { 3 };
    if args.len() != expected {
        return Err(format!("expected {expected} colour components"));
    }

    let mut out = [255u8; 4];
    for (slot, arg) in out.iter_mut().zip(&args) {
        let component = match arg.strip_suffix('%') {
            Some(pct) => parse_f32(pct)? * (255.0 / 100.0),
            None => parse_f32(arg)?,
        };
        *slot = component.clamp(0.0, 255.0) as u8;
    }
    Ok(Colourb::new(out[0], out[1], out[2], out[3]))
}

fn parse_hsl(value: &str) -> Result<Colourb, String> {
    let has_alpha = value.as_bytes().get(3) == Some(&b'a');
    let args = function_args(value, if has_alpha { 4 } else { 3 })?;
    let expected = if has_alpha { 4 } else { 3 };
    if args.len() != expected {
        return Err(format!("expected {expected} colour components"));
    }

    let h = parse_f32(args[0].trim_end_matches("deg"))?;
    let pct = |s: &str| -> Result<f32, String> {
        s.strip_suffix('%')
            .ok_or_else(|| "saturation and lightness must be percentages".to_owned())
            .and_then(parse_f32)
            .map(|v| v / 100.0)
    };
    let s = pct(args[1])?;
    let l = pct(args[2])?;
    let a = if has_alpha { parse_f32(args[3])? } else { 1.0 };

    let [r, g, b] = hsl_to_rgb(h, s, l);
    let to_u8 = |x: f32| (x.clamp(0.0, 1.0) * 255.0) as u8;
    Ok(Colourb::new(to_u8(r), to_u8(g), to_u8(b), to_u8(a)))
}

fn parse_f32(s: &str) -> Result<f32, String> {
    s.trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid number \"{s}\""))
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
