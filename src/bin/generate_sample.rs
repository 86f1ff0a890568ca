use anyhow::{Context, Result};

/// Minimal deterministic PRNG (splitmix64)
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform pick from a non-empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Uniform integer in `[lo, hi]`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % u64::from(hi - lo + 1)) as u32
    }

    /// True with probability `percent` / 100.
    fn chance(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }
}

const ADJECTIVES: [&str; 12] = [
    "Silent", "Golden", "Broken", "Electric", "Midnight", "Crimson", "Lost", "Hidden", "Final",
    "Distant", "Burning", "Paper",
];

const NOUNS: [&str; 12] = [
    "Horizon", "Empire", "Garden", "Station", "Letters", "Harbor", "Detective", "Summer",
    "Kingdom", "Voyage", "Orchard", "Frontier",
];

const GENRE_TAGS: [&str; 9] = [
    "Action",
    "Action & Adventure",
    "Comedies",
    "Documentaries",
    "Dramas",
    "Horror Movies",
    "Romantic Movies",
    "Sci-Fi & Fantasy",
    "Thrillers",
];

const RATINGS: [&str; 6] = ["G", "PG", "PG-13", "R", "TV-14", "TV-MA"];

const COUNTRIES: [&str; 8] = [
    "United States",
    "United Kingdom",
    "France",
    "Japan",
    "South Korea",
    "India",
    "Spain",
    "Mexico",
];

/// Comma-joined selection of 1–3 distinct genre tags.
fn random_genres(rng: &mut SampleRng) -> String {
    let count = rng.range(1, 3) as usize;
    let mut tags: Vec<&str> = Vec::with_capacity(count);
    while tags.len() < count {
        let tag = *rng.pick(&GENRE_TAGS);
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags.join(", ")
}

fn main() -> Result<()> {
    let mut rng = SampleRng::new(42);

    let output_path = "sample_catalog.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating sample CSV")?;
    writer
        .write_record([
            "show_id",
            "type",
            "title",
            "country",
            "release_year",
            "rating",
            "duration",
            "listed_in",
        ])
        .context("writing CSV header")?;

    let n_rows = 500;
    for i in 0..n_rows {
        let is_movie = rng.chance(80);
        let kind = if is_movie { "Movie" } else { "TV Show" };
        let title = format!("The {} {}", rng.pick(&ADJECTIVES), rng.pick(&NOUNS));
        let country = *rng.pick(&COUNTRIES);
        let rating = *rng.pick(&RATINGS);

        // A sprinkle of missing years keeps the year filter honest.
        let release_year = if rng.chance(5) {
            String::new()
        } else {
            rng.range(1972, 2021).to_string()
        };

        // Movies get minute strings, shows get season counts; a few rows
        // carry no usable duration at all.
        let duration = if rng.chance(4) {
            String::new()
        } else if is_movie {
            format!("{} min", rng.range(45, 180))
        } else {
            let seasons = rng.range(1, 9);
            if seasons == 1 {
                "1 Season".to_string()
            } else {
                format!("{seasons} Seasons")
            }
        };

        let show_id = format!("s{}", i + 1);
        let genres = random_genres(&mut rng);
        writer
            .write_record([
                show_id.as_str(),
                kind,
                title.as_str(),
                country,
                release_year.as_str(),
                rating,
                duration.as_str(),
                genres.as_str(),
            ])
            .with_context(|| format!("writing CSV row {i}"))?;
    }

    writer.flush().context("flushing sample CSV")?;
    println!("Wrote {n_rows} records to {output_path}");
    Ok(())
}
