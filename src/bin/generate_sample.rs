//! Write a synthetic `blank.png` / `sample.png` pair for trying the analyser.
//!
//! The blank is a bright, slightly uneven white. The sample is the same
//! field seen through a dye with a Gaussian absorption band around 550 nm,
//! so it comes out magenta and the green channel carries most of the signal.

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

const WIDTH: u32 = 600;
const HEIGHT: u32 = 200;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Per-channel absorbance of the synthetic dye at a given wavelength.
/// Each channel sees the band through its own sensitivity curve.
fn dye_absorbance(nm: f64) -> [f64; 3] {
    let band = gaussian(nm, 550.0, 35.0, 0.8);
    [
        band * gaussian(nm, 610.0, 60.0, 1.0) + 0.02,
        band * gaussian(nm, 540.0, 50.0, 1.0) + 0.02,
        band * gaussian(nm, 460.0, 50.0, 1.0) + 0.02,
    ]
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn to_byte(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let mut blank = RgbaImage::new(WIDTH, HEIGHT);
    let mut sample = RgbaImage::new(WIDTH, HEIGHT);

    for x in 0..WIDTH {
        let nm = 400.0 + x as f64 * 300.0 / WIDTH as f64;
        let absorbance = dye_absorbance(nm);
        // Mild vignetting so the blank is not perfectly flat.
        let illumination = 235.0 - 15.0 * ((x as f64 / WIDTH as f64) - 0.5).powi(2);

        for y in 0..HEIGHT {
            let mut b = [0u8; 4];
            let mut s = [0u8; 4];
            for c in 0..3 {
                let reference = illumination + rng.gauss(0.0, 1.5);
                let transmitted = reference * 10f64.powf(-absorbance[c]) + rng.gauss(0.0, 1.5);
                b[c] = to_byte(reference);
                s[c] = to_byte(transmitted);
            }
            b[3] = 255;
            s[3] = 255;
            blank.put_pixel(x, y, Rgba(b));
            sample.put_pixel(x, y, Rgba(s));
        }
    }

    blank.save("blank.png").context("writing blank.png")?;
    sample.save("sample.png").context("writing sample.png")?;

    println!("Wrote blank.png and sample.png ({WIDTH}x{HEIGHT})");
    Ok(())
}
