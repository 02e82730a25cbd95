use boxlight::core::rng::LcgRng;
use boxlight::core::settings::TracerSettings;
use boxlight::integrators::path::PathTracer;
use boxlight::math::constants::Float;
use boxlight::scenes::demo::demo_scene;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <x> <y> [--width N] [--height N] [--seed N]", args[0]);
        std::process::exit(1);
    }

    let x: usize = args[1].parse().unwrap_or(0);
    let y: usize = args[2].parse().unwrap_or(0);

    let mut width: usize = 640;
    let mut height: usize = 480;
    let mut seed: u64 = 0;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(width);
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(height);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(seed);
            }
            _ => {}
        }
        i += 1;
    }

    if x >= width || y >= height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, width, height);
        std::process::exit(2);
    }

    let scene = demo_scene();
    let tracer = PathTracer::new(TracerSettings::default());
    let mut rng = LcgRng::for_pixel(seed, 0, x, y);
    let ray = scene.camera().primary_ray(x as Float + 0.5, y as Float + 0.5, width, height);
    let dir = ray.dir();

    println!("trace_pixel_path: pixel=({}, {}) size={}x{} dir=({:.5}, {:.5}, {:.5})",
             x, y, width, height, dir.x, dir.y, dir.z);

    let path = tracer.trace(&scene, &ray, &mut rng);
    if path.is_empty() {
        println!("miss");
    }
    for (depth, hit) in path.hits().iter().enumerate() {
        let object = hit.object();
        let name = object.name.as_deref().unwrap_or("<unnamed>");
        let p = hit.point();
        let n = hit.normal();
        println!(
            "hit {}: {} (id {}) t={:.6} p=({:.5}, {:.5}, {:.5}) n=({:.1}, {:.1}, {:.1}) r={:.2} t={:.2} absorb={:.2}",
            depth,
            name,
            hit.object_id().index(),
            hit.distance(),
            p.x, p.y, p.z,
            n.x, n.y, n.z,
            object.effective_reflectivity(),
            object.effective_transparency(),
            object.absorption()
        );
    }

    let color = path.resolve_color();
    println!("resolved color: ({}, {}, {})", color.r, color.g, color.b);
}
