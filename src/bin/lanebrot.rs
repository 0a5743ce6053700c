use clap::{App, Arg, ArgMatches};
use num::Complex;
use std::str::FromStr;
use std::time::Instant;

use lanebrot::input::{Controls, InputState};
use lanebrot::region::{Pixel, Region};
use lanebrot::render::Renderer;

/// Given a string and a separator, returns the two values separated
/// by the separator.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const TOPLEFT: &str = "topleft";
const BOTTOMRIGHT: &str = "bottomright";
const STRIPS: &str = "strips";
const ITERATIONS: &str = "iterations";
const METHOD: &str = "method";
const FRAMES: &str = "frames";

fn args<'a>() -> ArgMatches<'a> {
    App::new("lanebrot")
        .version("0.1.0")
        .about("Mandelbrot set renderer with selectable compute strategies")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output image file (PNG)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1280x880")
                .validator(|s| validate_pair::<u32>(&s, 'x', "Could not parse frame size"))
                .help("Size of the frame in pixels"),
        )
        .arg(
            Arg::with_name(TOPLEFT)
                .required(false)
                .long(TOPLEFT)
                .short("l")
                .takes_value(true)
                .default_value("-2,1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse top left corner"))
                .help("Top left corner of the viewport on the complex plane"),
        )
        .arg(
            Arg::with_name(BOTTOMRIGHT)
                .required(false)
                .long(BOTTOMRIGHT)
                .short("r")
                .takes_value(true)
                .default_value("1,-1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse bottom right corner"))
                .help("Bottom right corner of the viewport on the complex plane"),
        )
        .arg(
            Arg::with_name(STRIPS)
                .required(false)
                .long(STRIPS)
                .short("t")
                .takes_value(true)
                .default_value("0")
                .validator(move |s| {
                    validate_range(
                        &s,
                        0usize,
                        512,
                        "Could not parse strip count",
                        "Strip count must be between 0 and 512",
                    )
                })
                .help("Strips (and pool workers) for the parallel strategies; 0 means one per CPU"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("16")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1u32,
                        10_000_000,
                        "Could not parse iteration budget",
                        "Iteration budget must be between 1 and 10000000",
                    )
                })
                .help("Iteration budget per pixel"),
        )
        .arg(
            Arg::with_name(METHOD)
                .required(false)
                .long(METHOD)
                .short("m")
                .takes_value(true)
                .default_value("5")
                .validator(move |s| {
                    validate_range(
                        &s,
                        0usize,
                        5,
                        "Could not parse method selector",
                        "Method selector must be between 0 and 5",
                    )
                })
                .help(
                    "Compute strategy: 0 direct, 1 stepped, 2 manual, \
                     3 simd lanes, 4 scoped threads, 5 worker pool",
                ),
        )
        .arg(
            Arg::with_name(FRAMES)
                .required(false)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1usize,
                        100_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 100000",
                    )
                })
                .help("Frames to render; each frame after the first zooms in at the centre"),
        )
        .get_matches()
}

fn write_image(
    filename: &str,
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<(), image::ImageError> {
    image::save_buffer(
        filename,
        pixels,
        width as u32,
        height as u32,
        image::ColorType::Rgb8,
    )
}

fn main() {
    let matches = args();

    let (width, height): (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing frame size");
    let frac_tl =
        parse_complex(matches.value_of(TOPLEFT).unwrap()).expect("Error parsing top left corner");
    let frac_br = parse_complex(matches.value_of(BOTTOMRIGHT).unwrap())
        .expect("Error parsing bottom right corner");
    let strips =
        usize::from_str(matches.value_of(STRIPS).unwrap()).expect("Could not parse strip count");
    let strips = if strips == 0 { num_cpus::get() } else { strips };
    let mut budget = u32::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration budget");
    let method =
        usize::from_str(matches.value_of(METHOD).unwrap()).expect("Could not parse method");
    let frames =
        usize::from_str(matches.value_of(FRAMES).unwrap()).expect("Could not parse frame count");

    let mut region = Region::new(frac_tl, frac_br, Pixel(0, 0), Pixel(width, height))
        .expect("Viewport is not valid");

    let mut renderer = Renderer::new(width, height, strips);
    let mut input = InputState::new();

    println!("{}x{} frame, {} strips", width, height, strips);

    for frame_number in 0..frames {
        // A scripted session stands in for live devices: the first
        // frame selects the strategy, every later frame zooms one
        // step in at the window centre.
        let controls = if frame_number == 0 {
            Controls {
                select_method: Some(method),
                ..Controls::default()
            }
        } else {
            Controls {
                zoom_in: true,
                cursor: (width as i32 / 2, height as i32 / 2),
                ..Controls::default()
            }
        };

        let input_time = Instant::now();
        region = input.handle_move(&controls, region);
        budget = input.handle_precision(&controls, budget);
        region = input.handle_zoom(&controls, region);
        let strategy = input.handle_method(&controls);
        let input_ms = input_time.elapsed().as_secs_f64() * 1000.0;

        let compute_time = Instant::now();
        renderer.render(strategy, &region, budget);
        let compute_ms = compute_time.elapsed().as_secs_f64() * 1000.0;

        println!(
            "frame {:>4}  {:<15}{:>9.3} ms compute {:>9.3} ms input  budget {:>6}",
            frame_number,
            strategy.label(),
            compute_ms,
            input_ms,
            budget
        );
    }

    let encode_time = Instant::now();
    let raw = renderer.raw_rgb();
    write_image(matches.value_of(OUTPUT).unwrap(), &raw, width, height)
        .expect("Could not write output image");
    println!(
        "{:<11}{:>9.3} ms",
        "encode",
        encode_time.elapsed().as_secs_f64() * 1000.0
    );
}
