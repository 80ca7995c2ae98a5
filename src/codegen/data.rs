//! Baked particle arrays.

use super::fragments::num;
use crate::config::ParticleConfig;
use crate::particle::spawn_particles;
use crate::scene::Scene;

/// Tuple layout shared by the data module and the component.
pub(crate) const PARTICLE_TUPLE_TYPE: &str =
    "type ParticleTuple = [x: number, y: number, color: string, masked: 0 | 1, size: number];\n";

/// `PARTICLES` and `MASK_GROUPS` declarations for `scene`.
///
/// Sizes are drawn with the engine's seeded sampler so the export matches
/// the preview particle for particle. With `exported` the declarations
/// carry `export` for a standalone data module.
pub(crate) fn particle_data(scene: &Scene, config: &ParticleConfig, exported: bool) -> String {
    let export = if exported { "export " } else { "" };
    let particles = spawn_particles(&scene.particles, &config.size, config.sampling.seed);

    let mut code = String::with_capacity(particles.len() * 32 + 256);
    code.push_str(&format!("{export}{PARTICLE_TUPLE_TYPE}\n"));

    code.push_str(&format!("{export}const PARTICLES: ParticleTuple[] = [\n"));
    for p in &particles {
        code.push_str(&format!(
            "  [{}, {}, \"{}\", {}, {}],\n",
            num(p.origin.x),
            num(p.origin.y),
            p.color.to_hex(),
            u8::from(p.masked),
            num(p.size)
        ));
    }
    code.push_str("];\n\n");

    code.push_str(&format!("{export}const MASK_GROUPS: Record<string, number[]> = {{\n"));
    for (slug, indices) in scene.mask_groups() {
        let list = indices.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
        code.push_str(&format!("  {slug:?}: [{list}],\n"));
    }
    code.push_str("};\n");

    code
}
