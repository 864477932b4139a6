//! Overlay emoji on a photo using face records supplied on the command line.
//!
//! Usage:
//!   cargo run --example emojify_photo -- <photo> <emoji-dir> <output> [face...]
//!
//! Each face is `x,y,width,height,smiling,left_eye_open,right_eye_open`.
//! The emoji directory holds `smile.png`, `frown.png`, `leftwink.png`, ...
//! Set `RUST_LOG=emojify=debug` to see classification details.

use emojify::{Detection, EmojiSet, Emojifier, FaceAttributes, FaceGeometry, OutputFormat};
use tracing_subscriber::EnvFilter;

fn parse_face(spec: &str) -> FaceAttributes {
    let values: Vec<f64> = spec
        .split(',')
        .map(|v| {
            v.trim()
                .parse()
                .unwrap_or_else(|e| panic!("bad number {v:?} in {spec:?}: {e}"))
        })
        .collect();
    let [x, y, width, height, smiling, left, right] = values[..] else {
        panic!("expected 7 comma-separated values, got {spec:?}");
    };
    FaceAttributes {
        bounds: FaceGeometry::new(x, y, width, height),
        smiling_probability: smiling,
        left_eye_open_probability: left,
        right_eye_open_probability: right,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!(
            "usage: emojify_photo <photo> <emoji-dir> <output> [x,y,w,h,smile,left,right ...]"
        );
        std::process::exit(2);
    }

    let input = std::fs::read(&args[0]).unwrap();
    let emojis = EmojiSet::load_dir(&args[1]).unwrap();
    if !emojis.is_complete() {
        eprintln!("warning: no emoji for {:?}", emojis.missing());
    }
    let faces: Vec<FaceAttributes> = args[3..].iter().map(|s| parse_face(s)).collect();

    let format = if args[2].ends_with(".png") {
        OutputFormat::Png
    } else {
        OutputFormat::Jpeg
    };

    let result = Emojifier::new(input)
        .unwrap()
        .emojis(emojis)
        .faces(faces)
        .format(format)
        .process()
        .unwrap();

    match result.detection {
        Detection::NoFaces => println!("no faces detected"),
        Detection::DetectorUnavailable => println!("face detector unavailable"),
        Detection::Faces(n) => {
            println!("{n} face(s):");
            for (i, report) in result.faces.iter().enumerate() {
                println!("  face {i}: {} -> {:?}", report.expression, report.overlay);
            }
        }
    }

    std::fs::write(&args[2], &result.data).unwrap();
    println!(
        "wrote {} ({}x{}, {} bytes)",
        args[2],
        result.width,
        result.height,
        result.data.len()
    );
}
