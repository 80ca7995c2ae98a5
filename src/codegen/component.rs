//! The exported React component.
//!
//! The per-frame function restates [`Engine::tick`](crate::engine::Engine::tick)
//! step for step: frame timing, skip level, quality observation, reveal,
//! then pointer, idle, spring, friction and integration, then batched
//! drawing.

use super::data::particle_data;
use super::fragments::{constants, helpers, Features, TYPES};
use super::{ExportVariant, DATA_MODULE};
use crate::config::{ParticleConfig, ShootingDirection};
use crate::scene::Scene;

pub(crate) fn component(scene: &Scene, config: &ParticleConfig, variant: ExportVariant) -> String {
    let features = Features::of(config);
    let mut code = String::new();

    code.push_str(&format!(
        "// Particle animation: {} particles on a {}x{} canvas.\n",
        scene.len(),
        scene.width,
        scene.height
    ));
    code.push_str("import React, { useEffect, useRef } from \"react\";\n");
    match variant {
        ExportVariant::SingleFile => {
            code.push('\n');
            code.push_str(&particle_data(scene, config, false));
            code.push_str("\nexport { MASK_GROUPS };\n");
        }
        ExportVariant::ComponentWithData => {
            code.push_str(&format!(
                "import {{ PARTICLES, MASK_GROUPS }} from \"./{DATA_MODULE}\";\n\n\
                 export {{ MASK_GROUPS }};\n"
            ));
        }
    }

    code.push('\n');
    code.push_str(&constants(scene, config, &features));
    code.push_str(TYPES);
    code.push_str(&helpers(config, &features));

    code.push_str(
        r#"
export interface ParticleAnimationProps {
  className?: string;
  style?: React.CSSProperties;
}

export default function ParticleAnimation({ className, style }: ParticleAnimationProps) {
  const canvasRef = useRef<HTMLCanvasElement>(null);

  useEffect(() => {
    const canvas = canvasRef.current;
    if (!canvas) return;
    const ctx = canvas.getContext("2d");
    if (!ctx) return;

    const particles: Particle[] = PARTICLES.map(([x, y, color, masked, size]) => ({
      x,
      y,
      vx: 0,
      vy: 0,
      originX: x,
      originY: y,
      size,
      color,
      r: parseInt(color.slice(1, 3), 16),
      g: parseInt(color.slice(3, 5), 16),
      b: parseInt(color.slice(5, 7), 16),
      masked: masked === 1,
      active: true,
      hueOffset: 0,
    }));
    const mouse: MouseState = { x: 0, y: 0, active: false };
"#,
    );

    code.push_str(&reveal_setup(config, &features));

    code.push_str("\n    let lastTime = -1;\n    let frameIndex = 0;\n    let skipLevel = 0;\n");
    if features.quality {
        code.push_str("    let qualityObserved = 0;\n    let qualitySlow = 0;\n    let qualityDecided = false;\n    let lockedSquare = false;\n");
    }
    if features.idle {
        code.push_str("    let idleTime = 0;\n");
    }
    code.push_str("    let rafId = 0;\n");

    code.push_str(
        r#"
    const frame = (time: number) => {
      const frameMs = lastTime < 0 ? FIRST_FRAME_MS : Math.max(0, time - lastTime);
      lastTime = time;

      if (frameMs > SLOW_FRAME_MS) skipLevel = Math.min(skipLevel + 1, MAX_SKIP_LEVEL);
      else if (frameMs < FAST_FRAME_MS) skipLevel = Math.max(skipLevel - 1, 0);
      const skip = Math.max(skipLevel, BASE_SKIP);
      const render = frameIndex % (skip + 1) === 0;
      frameIndex++;
"#,
    );

    if features.quality {
        let window = if features.reveal {
            "!animationComplete || mouse.active"
        } else {
            "mouse.active"
        };
        code.push_str(&format!(
            "\n      if (!qualityDecided && ({window})) {{\n\
             \x20       qualityObserved++;\n\
             \x20       if (frameMs > SLOW_FRAME_MS) qualitySlow++;\n\
             \x20       if (qualityObserved >= QUALITY_WINDOW) {{\n\
             \x20         lockedSquare = qualitySlow / qualityObserved > QUALITY_SLOW_RATIO;\n\
             \x20         qualityDecided = true;\n\
             \x20       }}\n\
             \x20     }}\n"
        ));
    }

    if features.reveal {
        code.push_str(&reveal_step(config));
    }

    code.push_str(&integration(&features));
    code.push_str(&draw(&features));

    code.push_str(
        r#"
      rafId = requestAnimationFrame(frame);
    };

    const onPointerMove = (e: PointerEvent) => {
      const rect = canvas.getBoundingClientRect();
      if (rect.width <= 0 || rect.height <= 0) return;
      mouse.x = ((e.clientX - rect.left) / rect.width) * WIDTH;
      mouse.y = ((e.clientY - rect.top) / rect.height) * HEIGHT;
      mouse.active = true;
    };
    const onPointerLeave = () => {
      mouse.active = false;
    };

    canvas.addEventListener("pointermove", onPointerMove);
    canvas.addEventListener("pointerdown", onPointerMove);
    canvas.addEventListener("pointerleave", onPointerLeave);
    rafId = requestAnimationFrame(frame);

    return () => {
      cancelAnimationFrame(rafId);
      canvas.removeEventListener("pointermove", onPointerMove);
      canvas.removeEventListener("pointerdown", onPointerMove);
      canvas.removeEventListener("pointerleave", onPointerLeave);
    };
  }, []);

  return <canvas ref={canvasRef} width={WIDTH} height={HEIGHT} className={className} style={style} />;
}
"#,
    );

    code
}

/// Pending state and activation order for the reveal.
fn reveal_setup(config: &ParticleConfig, features: &Features) -> String {
    if !features.reveal {
        return String::new();
    }
    let sort = match config.initial_animation.shooting_direction {
        ShootingDirection::TopToBottom => {
            "    order.sort((a, b) => particles[a].originY - particles[b].originY);\n".to_string()
        }
        ShootingDirection::AllDirections => "    const centerDist = (i: number) =>\n\
             \x20     (particles[i].originX - CENTER_X) ** 2 + (particles[i].originY - CENTER_Y) ** 2;\n\
             \x20   order.sort((a, b) => centerDist(a) - centerDist(b));\n"
            .to_string(),
    };
    format!(
        "\n    for (const p of particles) p.active = false;\n\
         \x20   const order = particles.map((_, i) => i);\n\
         {sort}\
         \x20   let activated = 0;\n\
         \x20   let budget = 0;\n\
         \x20   let settledMs = 0;\n\
         \x20   let animationComplete = false;\n"
    )
}

/// Activate particles at the configured rate, then settle.
fn reveal_step(config: &ParticleConfig) -> String {
    let launch = match config.initial_animation.shooting_direction {
        ShootingDirection::TopToBottom => "          p.x = p.originX;\n\
             \x20         p.y = -p.size;\n\
             \x20         p.vx = 0;\n\
             \x20         p.vy = PARTICLE_SPEED;\n",
        ShootingDirection::AllDirections => "          const dx = p.originX - CENTER_X;\n\
             \x20         const dy = p.originY - CENTER_Y;\n\
             \x20         const len = Math.hypot(dx, dy);\n\
             \x20         p.x = CENTER_X;\n\
             \x20         p.y = CENTER_Y;\n\
             \x20         p.vx = len > 0 ? (dx / len) * PARTICLE_SPEED : 0;\n\
             \x20         p.vy = len > 0 ? (dy / len) * PARTICLE_SPEED : 0;\n",
    };
    format!(
        "\n      if (!animationComplete) {{\n\
         \x20       budget += (PARTICLES_PER_SECOND * frameMs) / 1000;\n\
         \x20       const target = Math.min(Math.floor(Math.max(budget, 0)), order.length);\n\
         \x20       for (let k = activated; k < target; k++) {{\n\
         \x20         const p = particles[order[k]];\n\
         {launch}\
         \x20         p.active = true;\n\
         \x20       }}\n\
         \x20       activated = Math.max(activated, target);\n\
         \x20       if (activated === order.length) {{\n\
         \x20         settledMs += frameMs;\n\
         \x20         if (settledMs >= SETTLE_MS) animationComplete = true;\n\
         \x20       }}\n\
         \x20     }}\n"
    )
}

/// Forces and integration, in engine order.
fn integration(features: &Features) -> String {
    let mut code = String::from("\n");

    if features.bounce {
        code.push_str(
            "      const bouncing = !animationComplete;\n\
             \x20     const returnSpeed = bouncing ? BOUNCE_RETURN_SPEED : RETURN_SPEED;\n\
             \x20     const friction = bouncing ? BOUNCE_FRICTION : FRICTION;\n",
        );
    } else {
        code.push_str("      const returnSpeed = RETURN_SPEED;\n      const friction = FRICTION;\n");
    }

    let pointer_gate = if features.reveal {
        code.push_str("      const interactionAllowed = animationComplete || MOUSE_DURING_ANIMATION;\n");
        "interactionAllowed && !p.masked && mouse.active"
    } else {
        "!p.masked && mouse.active"
    };

    if features.idle {
        let gate = if features.reveal { "animationComplete" } else { "true" };
        code.push_str(&format!(
            "      const idleActive = {gate};\n\
             \x20     if (idleActive) idleTime += (frameMs / 1000) * IDLE_SPEED;\n"
        ));
    }

    code.push_str(&format!(
        "\n      for (const p of particles) {{\n\
         \x20       if (!p.active) continue;\n\
         \x20       if ({pointer_gate}) applyPointer(p, mouse, time);\n"
    ));
    if features.idle {
        code.push_str("        if (idleActive && (!p.masked || IDLE_AFFECTS_MASKED)) applyIdle(p, mouse, idleTime);\n");
    }
    code.push_str(
        "        p.vx += (p.originX - p.x) * returnSpeed * SPEED;\n\
         \x20       p.vy += (p.originY - p.y) * returnSpeed * SPEED;\n\
         \x20       p.vx *= friction;\n\
         \x20       p.vy *= friction;\n\
         \x20       p.x += p.vx;\n\
         \x20       p.y += p.vy;\n\
         \x20     }\n",
    );

    code
}

/// Clear or fade, connections, then one fill per color group.
fn draw(features: &Features) -> String {
    let mut code = String::from("\n      if (render) {\n");

    if features.trails {
        code.push_str("        ctx.fillStyle = TRAIL_FILL;\n        ctx.fillRect(0, 0, WIDTH, HEIGHT);\n");
    } else {
        code.push_str("        ctx.clearRect(0, 0, WIDTH, HEIGHT);\n");
    }
    if features.connections {
        code.push_str("        drawConnections(ctx, particles);\n");
    }

    let color = if features.velocity_color { "velocityColor(p)" } else { "p.color" };
    let trace = if features.square_fallback {
        "lockedSquare ? traceSquare : traceShape"
    } else {
        "traceShape"
    };
    code.push_str(&format!(
        "\n        const unmasked = new Map<string, Particle[]>();\n\
         \x20       const masked = new Map<string, Particle[]>();\n\
         \x20       for (const p of particles) {{\n\
         \x20         if (!p.active) continue;\n\
         \x20         const color = {color};\n\
         \x20         const layer = p.masked ? masked : unmasked;\n\
         \x20         const group = layer.get(color);\n\
         \x20         if (group) group.push(p);\n\
         \x20         else layer.set(color, [p]);\n\
         \x20       }}\n\
         \n\
         \x20       const trace = {trace};\n\
         \x20       for (const layer of MASKED_ON_TOP ? [unmasked, masked] : [masked, unmasked]) {{\n\
         \x20         for (const [color, group] of layer) {{\n\
         \x20           ctx.beginPath();\n\
         \x20           for (const p of group) trace(ctx, p.x, p.y, p.size);\n\
         \x20           ctx.fillStyle = color;\n\
         \x20           ctx.fill();\n\
         \x20         }}\n\
         \x20       }}\n\
         \x20     }}\n"
    ));

    code
}
