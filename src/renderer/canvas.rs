//! Canvas 2D backend (WASM only)

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::commands::{DrawCommand, Stroke, TextAlign};
use super::color::Rgb;

/// Execute a frame's draw list on a 2D context
pub fn execute(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    commands: &[DrawCommand],
) -> Result<(), JsValue> {
    for command in commands {
        match command {
            DrawCommand::Clear { color } => {
                ctx.set_fill_style_str(&color.to_hex());
                ctx.fill_rect(0.0, 0.0, width, height);
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                ctx.save();
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius.max(0.0) as f64,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                fill_and_stroke(ctx, *fill, *stroke);
                ctx.restore();
            }
            DrawCommand::Square {
                center,
                half_size,
                rotation_deg,
                corner_radius,
                fill,
                stroke,
            } => {
                let h = *half_size as f64;
                let r = *corner_radius as f64;
                ctx.save();
                ctx.translate(center.x as f64, center.y as f64)?;
                ctx.rotate(rotation_deg.to_radians() as f64)?;
                ctx.begin_path();
                ctx.move_to(-h + r, -h);
                ctx.arc_to(h, -h, h, h, r)?;
                ctx.arc_to(h, h, -h, h, r)?;
                ctx.arc_to(-h, h, -h, -h, r)?;
                ctx.arc_to(-h, -h, h, -h, r)?;
                ctx.close_path();
                fill_and_stroke(ctx, *fill, *stroke);
                ctx.restore();
            }
            DrawCommand::Text {
                pos,
                text,
                size_px,
                align,
                color,
            } => {
                ctx.set_font(&format!("400 {}px \"Open Sans\", sans-serif", size_px.round()));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                ctx.set_text_baseline("middle");
                ctx.set_fill_style_str(&color.to_hex());
                ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
        }
    }
    Ok(())
}

fn fill_and_stroke(ctx: &CanvasRenderingContext2d, fill: Option<Rgb>, stroke: Option<Stroke>) {
    if let Some(fill) = fill {
        ctx.set_fill_style_str(&fill.to_hex());
        ctx.fill();
    }
    if let Some(stroke) = stroke {
        ctx.set_stroke_style_str(&stroke.color.to_hex());
        ctx.set_line_width(stroke.width as f64);
        ctx.stroke();
    }
}
