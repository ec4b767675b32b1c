//! Canvas 2D backend

use std::f64::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{
    FrameView, GRASS_HEIGHT, PLAY_AGAIN_BUTTON, PORTAL_SPARKLES, PlayerPose, RenderSink,
    banana_sway, death_burst, palette, parallax_profile,
};
use crate::consts::{V_HEIGHT, V_WIDTH};
use crate::sim::{Entity, EntityKind, Facing, Level, PlayerState, SessionStatus};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    sparkle_rng: Pcg32,
}

impl CanvasRenderer {
    /// Returns None if the canvas has no 2D context
    pub fn new(canvas: &HtmlCanvasElement, seed: u64) -> Option<Self> {
        canvas.set_width(V_WIDTH as u32);
        canvas.set_height(V_HEIGHT as u32);

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        Some(Self {
            ctx,
            sparkle_rng: Pcg32::seed_from_u64(seed),
        })
    }

    fn draw_background(&self, time: f64) {
        let ctx = &self.ctx;
        let sky = ctx.create_linear_gradient(0.0, 0.0, 0.0, V_HEIGHT);
        sky.add_color_stop(0.0, palette::SKY_TOP).ok();
        sky.add_color_stop(1.0, palette::SKY_BOTTOM).ok();
        ctx.set_fill_style_canvas_gradient(&sky);
        ctx.fill_rect(0.0, 0.0, V_WIDTH, V_HEIGHT);

        ctx.set_fill_style_str(palette::MOUNTAINS);
        self.fill_layer(time * 0.05, 100.0, 300.0, 0.4);
        ctx.set_fill_style_str(palette::HILLS);
        self.fill_layer(time * 0.1, 150.0, 450.0, 0.6);
    }

    fn fill_layer(&self, offset: f64, amplitude: f64, baseline: f64, frequency: f64) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(0.0, V_HEIGHT);
        for p in parallax_profile(offset, amplitude, baseline, frequency) {
            ctx.line_to(p.x, p.y);
        }
        ctx.line_to(V_WIDTH, V_HEIGHT);
        ctx.fill();
    }

    fn draw_platforms(&self, platforms: &[Entity]) {
        let ctx = &self.ctx;
        for p in platforms {
            let r = p.rect;
            ctx.set_fill_style_str(palette::EARTH);
            ctx.fill_rect(r.x, r.y, r.w, r.h);
            ctx.set_fill_style_str(palette::GRASS);
            ctx.fill_rect(r.x, r.y, r.w, GRASS_HEIGHT.min(r.h));
        }
    }

    fn draw_hazards(&self, hazards: &[Entity]) {
        let ctx = &self.ctx;
        for h in hazards {
            let r = h.rect;
            match h.kind {
                EntityKind::Spike => {
                    ctx.set_fill_style_str(palette::SPIKE);
                    ctx.begin_path();
                    ctx.move_to(r.x, r.bottom());
                    ctx.line_to(r.x + r.w / 2.0, r.y);
                    ctx.line_to(r.right(), r.bottom());
                    ctx.fill();
                }
                EntityKind::MovingHazard { .. } => {
                    let c = r.center();
                    ctx.set_fill_style_str(palette::PATROL);
                    ctx.begin_path();
                    ctx.arc(c.x, c.y, r.w / 2.0, 0.0, TAU).ok();
                    ctx.fill();
                    ctx.set_fill_style_str(palette::STRIPE);
                    ctx.fill_rect(r.x + r.w * 0.2, r.y, r.w * 0.2, r.h);
                    ctx.fill_rect(r.x + r.w * 0.6, r.y, r.w * 0.2, r.h);
                }
                _ => {}
            }
        }
    }

    fn draw_bananas(&self, collectibles: &[Entity], elapsed_ms: f64) {
        let ctx = &self.ctx;
        let sway = banana_sway(elapsed_ms);
        ctx.set_fill_style_str(palette::BANANA);
        for b in collectibles.iter().filter(|b| !b.is_collected()) {
            let c = b.rect.center();
            ctx.save();
            ctx.translate(c.x, c.y).ok();
            ctx.rotate(sway).ok();
            ctx.begin_path();
            ctx.ellipse(0.0, 0.0, 15.0, 8.0, 0.0, 0.0, TAU).ok();
            ctx.fill();
            ctx.restore();
        }
    }

    fn draw_portal(&mut self, level: &Level, ready: bool, animate: bool) {
        let r = level.portal.rect;
        let c = r.center();
        let ctx = &self.ctx;

        ctx.set_stroke_style_str(if ready { palette::PORTAL_READY } else { palette::PORTAL_CLOSED });
        ctx.set_line_width(5.0);
        ctx.begin_path();
        ctx.ellipse(c.x, c.y, r.w / 2.0, r.h / 2.0, 0.0, 0.0, TAU).ok();
        ctx.stroke();

        if !ready {
            return;
        }
        ctx.set_fill_style_str(palette::PORTAL_GLOW);
        ctx.fill();

        if animate {
            ctx.set_fill_style_str(palette::SPARKLE);
            for _ in 0..PORTAL_SPARKLES {
                let px = r.x + self.sparkle_rng.random::<f64>() * r.w;
                let py = r.y + self.sparkle_rng.random::<f64>() * r.h;
                self.ctx.fill_rect(px, py, 2.0, 2.0);
            }
        }
    }

    fn draw_player(&self, p: &PlayerState, time: f64) {
        let ctx = &self.ctx;
        let c = p.rect().center();
        let pose = PlayerPose::for_anim(p.anim, time);
        let b = pose.bounce;

        ctx.save();
        ctx.translate(c.x, c.y).ok();
        if p.facing == Facing::Left {
            ctx.scale(-1.0, 1.0).ok();
        }

        // Tail
        ctx.set_stroke_style_str(palette::EARTH);
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.move_to(-10.0, 10.0);
        ctx.quadratic_curve_to(-25.0, 10.0 + (time * 0.1).sin() * 5.0, -20.0, -5.0);
        ctx.stroke();

        // Body and head
        self.fill_ellipse(0.0, 5.0 - b, 15.0, 18.0, palette::FUR);
        self.fill_ellipse(0.0, 8.0 - b, 10.0, 12.0, palette::FUR_LIGHT);
        self.fill_circle(0.0, -15.0 - b, 12.0, palette::FUR);
        self.fill_circle(-12.0, -18.0 - b, 4.0, palette::FUR);
        self.fill_circle(12.0, -18.0 - b, 4.0, palette::FUR);
        self.fill_ellipse(0.0, -13.0 - b, 9.0, 7.0, palette::FUR_LIGHT);
        self.fill_circle(-4.0, -15.0 - b, 1.5, palette::STRIPE);
        self.fill_circle(4.0, -15.0 - b, 1.5, palette::STRIPE);

        // Limbs
        ctx.set_stroke_style_str(palette::EARTH);
        ctx.set_line_width(4.0);
        ctx.set_line_cap("round");
        ctx.begin_path();
        ctx.move_to(-10.0, 0.0);
        ctx.line_to(-18.0, pose.arm_y);
        ctx.move_to(10.0, 0.0);
        ctx.line_to(18.0, pose.arm_y);
        ctx.move_to(-8.0, 15.0 - b);
        ctx.line_to(-8.0 + pose.limb_angle * 10.0, 25.0 - b);
        ctx.move_to(8.0, 15.0 - b);
        ctx.line_to(8.0 - pose.limb_angle * 10.0, 25.0 - b);
        ctx.stroke();

        ctx.restore();
    }

    fn draw_death_burst(&self, p: &PlayerState) {
        for dot in death_burst(p) {
            self.fill_circle(dot.x, dot.y, 5.0, palette::FUR);
        }
    }

    fn fill_circle(&self, x: f64, y: f64, r: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.arc(x, y, r, 0.0, TAU).ok();
        self.ctx.fill();
    }

    fn fill_ellipse(&self, x: f64, y: f64, rx: f64, ry: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.ellipse(x, y, rx, ry, 0.0, 0.0, TAU).ok();
        self.ctx.fill();
    }

    fn draw_hud(&self, view: &FrameView<'_>) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(palette::HUD_PANEL);
        ctx.fill_rect(24.0, 24.0, 220.0, 64.0);
        ctx.set_fill_style_str(palette::PATROL);
        ctx.fill_rect(V_WIDTH - 244.0, 24.0, 220.0, 64.0);

        ctx.set_text_align("left");
        ctx.set_fill_style_str(palette::EARTH);
        ctx.set_font("900 26px sans-serif");
        ctx.fill_text(&view.level_label().to_uppercase(), 40.0, 66.0).ok();

        ctx.set_fill_style_str(palette::WIN_TEXT);
        ctx.set_font("900 14px sans-serif");
        ctx.fill_text("BANANAS", V_WIDTH - 228.0, 48.0).ok();
        ctx.set_font("900 26px sans-serif");
        ctx.fill_text(&view.banana_label(), V_WIDTH - 228.0, 78.0).ok();
    }

    fn draw_win_screen(&self) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(palette::WIN_BACKDROP);
        ctx.fill_rect(0.0, 0.0, V_WIDTH, V_HEIGHT);

        ctx.set_text_align("center");
        ctx.set_fill_style_str(palette::WIN_TEXT);
        ctx.set_font("900 64px sans-serif");
        ctx.fill_text("KING OF THE JUNGLE!", V_WIDTH / 2.0, V_HEIGHT / 2.0 - 40.0).ok();
        ctx.set_font("20px sans-serif");
        ctx.fill_text(
            "You collected every banana and escaped the jungle.",
            V_WIDTH / 2.0,
            V_HEIGHT / 2.0 + 10.0,
        )
        .ok();

        let b = PLAY_AGAIN_BUTTON;
        ctx.set_fill_style_str(palette::WIN_TEXT);
        ctx.begin_path();
        ctx.arc(b.x + b.h / 2.0, b.y + b.h / 2.0, b.h / 2.0, PI / 2.0, PI * 1.5).ok();
        ctx.arc(b.right() - b.h / 2.0, b.y + b.h / 2.0, b.h / 2.0, -PI / 2.0, PI / 2.0).ok();
        ctx.fill();

        ctx.set_fill_style_str(palette::SPARKLE);
        ctx.set_font("900 28px sans-serif");
        ctx.fill_text("PLAY AGAIN", b.center().x, b.center().y + 10.0).ok();
    }
}

impl RenderSink for CanvasRenderer {
    fn render(&mut self, view: &FrameView<'_>) {
        let time = view.anim_time();
        let sway_clock = if view.reduced_motion { 0.0 } else { view.elapsed_ms };

        self.ctx.clear_rect(0.0, 0.0, V_WIDTH, V_HEIGHT);
        self.draw_background(time);
        self.draw_platforms(&view.level.platforms);
        self.draw_hazards(&view.level.hazards);
        self.draw_bananas(&view.level.collectibles, sway_clock);
        self.draw_portal(view.level, view.portal_ready(), !view.reduced_motion);

        if view.player.dead {
            self.draw_death_burst(view.player);
        } else {
            self.draw_player(view.player, time);
        }

        match view.status {
            SessionStatus::Playing => self.draw_hud(view),
            SessionStatus::Won => self.draw_win_screen(),
        }
    }
}
