use crate::environment::repo_types::EnvironmentSample;

const NEUTRAL: u8 = 3;

/// 15..25 °C scores best; below 0 or above 35 scores worst.
pub fn temperature_score(celsius: f64) -> u8 {
    if !(0.0..=35.0).contains(&celsius) {
        1
    } else if celsius < 5.0 || celsius >= 32.0 {
        2
    } else if celsius < 10.0 || celsius >= 28.0 {
        3
    } else if celsius < 15.0 || celsius >= 25.0 {
        4
    } else {
        5
    }
}

/// 40..60 % scores best.
pub fn humidity_score(percent: f64) -> u8 {
    if percent < 10.0 || percent >= 90.0 {
        1
    } else if percent < 20.0 || percent >= 80.0 {
        2
    } else if percent < 30.0 || percent >= 70.0 {
        3
    } else if percent < 40.0 || percent >= 60.0 {
        4
    } else {
        5
    }
}

/// Inverted: the higher the UV index the lower the score.
pub fn uv_score(index: f64) -> u8 {
    if index >= 11.0 {
        1
    } else if index >= 8.0 {
        2
    } else if index >= 6.0 {
        3
    } else if index >= 3.0 {
        4
    } else {
        5
    }
}

fn sub_score(value: Option<f64>, bucket: fn(f64) -> u8) -> u8 {
    value.filter(|v| v.is_finite()).map_or(NEUTRAL, bucket)
}

pub fn climate_score(
    temperature_c: Option<f64>,
    humidity: Option<f64>,
    uv_index: Option<f64>,
) -> u8 {
    let sum = sub_score(temperature_c, temperature_score)
        + sub_score(humidity, humidity_score)
        + sub_score(uv_index, uv_score);
    let mean = (f64::from(sum) / 3.0).round() as u8;
    mean.clamp(1, 5)
}

/// Neutral when the sample is missing altogether.
pub fn sample_score(sample: Option<&EnvironmentSample>) -> u8 {
    match sample {
        Some(s) => climate_score(s.avg_temp_c, s.avg_humidity, s.uv_index),
        None => NEUTRAL,
    }
}
