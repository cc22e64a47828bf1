use eframe::egui::Color32;
use tracing::warn;

use crate::config::{DomainScope, RadiusCurve, ScaleSettings};
use crate::topics::{Record, WINDOW_SPAN, WindowEntry};
use crate::util::parse_hex_color;

const LOG_DOMAIN_LOWER_DIVISOR: f64 = 3.0;
const LOG_DOMAIN_UPPER_FACTOR: f64 = 3.5;
const LOG_INPUT_FLOOR: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyDomain {
    pub min: f64,
    pub max: f64,
}

impl FrequencyDomain {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |domain, value| {
            Some(match domain {
                None => Self {
                    min: value,
                    max: value,
                },
                Some(Self { min, max }) => Self {
                    min: min.min(value),
                    max: max.max(value),
                },
            })
        })
    }

    fn has_spread(self) -> bool {
        self.max > self.min
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
    curve: RadiusCurve,
    lower: f64,
    upper: f64,
    min_radius: f32,
    max_radius: f32,
    constant: Option<f32>,
}

impl RadiusScale {
    /// `None` yields a constant mid-size scale. A domain without positive
    /// values pins every bubble to `min_radius`.
    pub fn new(
        curve: RadiusCurve,
        domain: Option<FrequencyDomain>,
        min_radius: f32,
        max_radius: f32,
    ) -> Self {
        let max_radius = max_radius.max(0.0);
        let min_radius = min_radius.clamp(0.0, max_radius);
        let mut scale = Self {
            curve,
            lower: 0.0,
            upper: 0.0,
            min_radius,
            max_radius,
            constant: None,
        };

        let Some(domain) = domain else {
            scale.constant = Some((max_radius * 0.5).max(min_radius));
            return scale;
        };
        if domain.max <= 0.0 {
            scale.constant = Some(min_radius);
            return scale;
        }

        match curve {
            RadiusCurve::Log => {
                scale.lower = domain.min.max(LOG_INPUT_FLOOR) / LOG_DOMAIN_LOWER_DIVISOR;
                scale.upper = domain.max.max(LOG_INPUT_FLOOR) * LOG_DOMAIN_UPPER_FACTOR;
            }
            RadiusCurve::Sqrt => {
                scale.lower = 0.0;
                scale.upper = domain.max;
            }
        }
        scale
    }

    pub fn radius(&self, frequency: f64) -> f32 {
        if let Some(constant) = self.constant {
            return constant;
        }

        let t = match self.curve {
            RadiusCurve::Log => {
                let value = frequency.max(LOG_INPUT_FLOOR);
                (value.ln() - self.lower.ln()) / (self.upper.ln() - self.lower.ln())
            }
            RadiusCurve::Sqrt => (frequency.max(0.0) / self.upper).sqrt(),
        };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
        ((t as f32) * self.max_radius).max(self.min_radius)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    stops: Vec<Color32>,
    domain: Option<FrequencyDomain>,
}

impl ColorScale {
    pub fn new(stops: Vec<Color32>, domain: Option<FrequencyDomain>) -> Self {
        let stops = if stops.is_empty() {
            default_color_stops()
        } else {
            stops
        };
        Self {
            stops,
            domain: domain.filter(|domain| domain.has_spread()),
        }
    }

    pub fn color(&self, frequency: f64) -> Color32 {
        let Some(domain) = self.domain else {
            return self.stops[self.stops.len() / 2];
        };
        if self.stops.len() == 1 {
            return self.stops[0];
        }

        let t = ((frequency - domain.min) / (domain.max - domain.min)).clamp(0.0, 1.0) as f32;
        let position = t * (self.stops.len() - 1) as f32;
        let index = (position.floor() as usize).min(self.stops.len() - 2);
        lerp_color(self.stops[index], self.stops[index + 1], position - index as f32)
    }
}

fn lerp_color(from: Color32, to: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;
    Color32::from_rgb(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
    )
}

fn default_color_stops() -> Vec<Color32> {
    vec![
        Color32::from_rgb(0xFC, 0xCF, 0xCD),
        Color32::from_rgb(0xF8, 0x84, 0x94),
        Color32::from_rgb(0xE8, 0x00, 0x00),
    ]
}

pub fn color_stops(colors: &[String]) -> Vec<Color32> {
    let parsed = colors
        .iter()
        .map(|value| parse_hex_color(value))
        .collect::<Option<Vec<_>>>();
    match parsed {
        Some(stops) if (3..=5).contains(&stops.len()) => stops,
        _ => {
            warn!(?colors, "color gradient needs 3-5 #RRGGBB stops, using default");
            default_color_stops()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    pub position: f32,
    pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterScale {
    start: f32,
    stop: f32,
    step: f32,
    padding: f32,
}

impl ClusterScale {
    pub fn new(width: f32, inset: f32, padding: f32) -> Self {
        let width = width.max(0.0);
        let start = inset.clamp(0.0, width * 0.5);
        let stop = (width - inset).max(start);
        let padding = padding.max(0.0);
        let denominator = (WINDOW_SPAN as f32 - 1.0 + 2.0 * padding).max(1.0);
        Self {
            start,
            stop,
            step: (stop - start) / denominator,
            padding,
        }
    }

    pub fn x(&self, slot: usize) -> f32 {
        self.start + self.step * (self.padding + slot as f32)
    }

    pub fn range(&self) -> (f32, f32) {
        (self.start, self.stop)
    }

    pub fn anchors(&self) -> Vec<f32> {
        (0..WINDOW_SPAN).map(|slot| self.x(slot)).collect()
    }

    pub fn ticks(&self, window: &[String]) -> Vec<AxisTick> {
        (0..WINDOW_SPAN)
            .map(|slot| AxisTick {
                position: self.x(slot),
                label: window.get(slot).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SentimentScale {
    top: f32,
    bottom: f32,
}

impl SentimentScale {
    pub fn new(height: f32, inset: f32) -> Self {
        let height = height.max(0.0);
        let top = inset.clamp(0.0, height * 0.5);
        Self {
            top,
            bottom: (height - inset).max(top),
        }
    }

    pub fn y(&self, sentiment: f64) -> f32 {
        let sentiment = if sentiment.is_finite() {
            sentiment.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let t = ((1.0 - sentiment) * 0.5) as f32;
        self.top + t * (self.bottom - self.top)
    }

    pub fn ticks(&self, count: usize) -> Vec<AxisTick> {
        let step = nice_step(2.0, count.max(1));
        let first = (-1.0 / step - 1e-9).ceil() as i64;
        let last = (1.0 / step + 1e-9).floor() as i64;
        (first..=last)
            .map(|index| {
                let value = index as f64 * step;
                AxisTick {
                    position: self.y(value),
                    label: format_tick(value),
                }
            })
            .collect()
    }
}

fn nice_step(span: f64, count: usize) -> f64 {
    let raw = span / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

fn format_tick(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        "0".to_string()
    } else if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SlotScales {
    pub radius: RadiusScale,
    pub color: ColorScale,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartScales {
    pub slots: Vec<SlotScales>,
    pub cluster: ClusterScale,
    pub sentiment: SentimentScale,
}

impl ChartScales {
    pub fn build(
        settings: &ScaleSettings,
        entries: &[WindowEntry<'_>],
        dataset: &[Record],
        width: f32,
        height: f32,
    ) -> Self {
        let stops = color_stops(&settings.colors);
        let slots = slot_domains(settings.domain_scope, entries, dataset)
            .into_iter()
            .map(|domain| SlotScales {
                radius: RadiusScale::new(
                    settings.curve,
                    domain,
                    settings.min_radius,
                    settings.max_radius,
                ),
                color: ColorScale::new(stops.clone(), domain),
            })
            .collect();

        Self {
            slots,
            cluster: ClusterScale::new(width, settings.cluster_inset, settings.cluster_padding),
            sentiment: SentimentScale::new(height, settings.sentiment_inset),
        }
    }

    pub fn resize(&mut self, settings: &ScaleSettings, width: f32, height: f32) {
        self.cluster = ClusterScale::new(width, settings.cluster_inset, settings.cluster_padding);
        self.sentiment = SentimentScale::new(height, settings.sentiment_inset);
    }

    pub fn slot(&self, slot: usize) -> Option<&SlotScales> {
        self.slots.get(slot)
    }
}

fn slot_domains(
    scope: DomainScope,
    entries: &[WindowEntry<'_>],
    dataset: &[Record],
) -> Vec<Option<FrequencyDomain>> {
    match scope {
        DomainScope::Period => (0..WINDOW_SPAN)
            .map(|slot| {
                FrequencyDomain::from_values(
                    entries
                        .iter()
                        .filter(|entry| entry.slot == slot)
                        .map(|entry| entry.record.frequency),
                )
            })
            .collect(),
        DomainScope::Window => {
            let domain =
                FrequencyDomain::from_values(entries.iter().map(|entry| entry.record.frequency));
            vec![domain; WINDOW_SPAN]
        }
        DomainScope::Dataset => {
            let domain =
                FrequencyDomain::from_values(dataset.iter().map(|record| record.frequency));
            vec![domain; WINDOW_SPAN]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::{periods, select_window, test_record};

    fn domain(min: f64, max: f64) -> Option<FrequencyDomain> {
        Some(FrequencyDomain { min, max })
    }

    #[test]
    fn radius_is_monotonic_for_both_curves() {
        let values = [0.0, 0.5, 1.0, 2.0, 3.0, 10.0, 55.0, 120.0];
        for curve in [RadiusCurve::Log, RadiusCurve::Sqrt] {
            let scale = RadiusScale::new(curve, domain(0.0, 120.0), 0.0, 70.0);
            for pair in values.windows(2) {
                assert!(
                    scale.radius(pair[0]) <= scale.radius(pair[1]),
                    "{curve:?} {pair:?}"
                );
            }
            assert!(scale.radius(120.0) <= 70.0);
        }
    }

    #[test]
    fn log_radius_uses_padded_domain() {
        let scale = RadiusScale::new(RadiusCurve::Log, domain(3.0, 10.0), 0.0, 70.0);

        let expected = 70.0 * ((3.0f64.ln() - 1.0f64.ln()) / (35.0f64.ln() - 1.0f64.ln()));
        assert!((scale.radius(3.0) - expected as f32).abs() < 1e-3);
        assert!(scale.radius(10.0) < 70.0);
    }

    #[test]
    fn sqrt_radius_is_area_proportional() {
        let scale = RadiusScale::new(RadiusCurve::Sqrt, domain(1.0, 100.0), 0.0, 60.0);

        assert_eq!(scale.radius(100.0), 60.0);
        assert!((scale.radius(25.0) - 30.0).abs() < 1e-4);
        assert_eq!(scale.radius(0.0), 0.0);
    }

    #[test]
    fn degenerate_domains_never_produce_nan() {
        let zero = RadiusScale::new(RadiusCurve::Log, domain(0.0, 0.0), 2.0, 70.0);
        assert_eq!(zero.radius(0.0), 2.0);
        assert_eq!(zero.radius(-4.0), 2.0);

        let empty = RadiusScale::new(RadiusCurve::Sqrt, None, 2.0, 70.0);
        assert_eq!(empty.radius(10.0), 35.0);

        let single = RadiusScale::new(RadiusCurve::Log, domain(4.0, 4.0), 2.0, 70.0);
        assert!(single.radius(4.0).is_finite());

        let with_zero = RadiusScale::new(RadiusCurve::Log, domain(0.0, 9.0), 2.0, 70.0);
        let radius = with_zero.radius(0.0);
        assert!(radius.is_finite());
        assert!(radius >= 2.0 && radius < with_zero.radius(1.0));
    }

    #[test]
    fn min_radius_floors_the_domain_minimum() {
        let scale = RadiusScale::new(RadiusCurve::Sqrt, domain(0.0, 9.0), 2.0, 60.0);
        assert_eq!(scale.radius(0.0), 2.0);
    }

    #[test]
    fn color_runs_light_to_saturated() {
        let scale = ColorScale::new(default_color_stops(), domain(0.0, 10.0));

        assert_eq!(scale.color(0.0), Color32::from_rgb(0xFC, 0xCF, 0xCD));
        assert_eq!(scale.color(5.0), Color32::from_rgb(0xF8, 0x84, 0x94));
        assert_eq!(scale.color(10.0), Color32::from_rgb(0xE8, 0x00, 0x00));
        assert_eq!(scale.color(99.0), Color32::from_rgb(0xE8, 0x00, 0x00));

        let mut last_green = u8::MAX;
        for step in 0..=10 {
            let green = scale.color(step as f64).g();
            assert!(green <= last_green);
            last_green = green;
        }
    }

    #[test]
    fn degenerate_color_domain_uses_middle_stop() {
        let scale = ColorScale::new(default_color_stops(), domain(4.0, 4.0));
        assert_eq!(scale.color(4.0), Color32::from_rgb(0xF8, 0x84, 0x94));
    }

    #[test]
    fn invalid_gradient_falls_back() {
        assert_eq!(color_stops(&["#000000".to_string()]), default_color_stops());
        let custom = ["#000000", "#111111", "#222222", "#333333"]
            .map(str::to_string)
            .to_vec();
        assert_eq!(color_stops(&custom).len(), 4);
    }

    #[test]
    fn cluster_scale_matches_point_scale() {
        let scale = ClusterScale::new(1000.0, 100.0, 0.4);

        let step = 800.0 / 2.8;
        assert!((scale.x(0) - (100.0 + step * 0.4)).abs() < 1e-3);
        assert!((scale.x(1) - 500.0).abs() < 1e-3);
        assert!((scale.x(2) - (900.0 - step * 0.4)).abs() < 1e-3);
    }

    #[test]
    fn cluster_ticks_label_missing_periods_blank() {
        let scale = ClusterScale::new(600.0, 100.0, 0.4);
        let ticks = scale.ticks(&["Apr".to_string()]);

        assert_eq!(ticks.len(), WINDOW_SPAN);
        assert_eq!(ticks[0].label, "Apr");
        assert!(ticks[1].label.is_empty());
    }

    #[test]
    fn sentiment_scale_is_inverted() {
        let scale = SentimentScale::new(600.0, 100.0);

        assert_eq!(scale.y(1.0), 100.0);
        assert_eq!(scale.y(-1.0), 500.0);
        assert_eq!(scale.y(0.0), 300.0);
        assert_eq!(scale.y(4.0), 100.0);
        assert_eq!(scale.y(f64::NAN), 300.0);
    }

    #[test]
    fn sentiment_ticks_follow_requested_count() {
        let scale = SentimentScale::new(600.0, 100.0);

        let labels = scale
            .ticks(2)
            .into_iter()
            .map(|tick| tick.label)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["-1", "0", "1"]);
        assert_eq!(scale.ticks(10).len(), 11);
    }

    #[test]
    fn period_scope_builds_one_domain_per_slot() {
        let records = vec![
            test_record(1, "Jan", 10.0, 0.0),
            test_record(2, "Jan", 2.0, 0.0),
            test_record(1, "Feb", 100.0, 0.0),
            test_record(2, "Feb", 50.0, 0.0),
        ];
        let all = periods(&records);
        let entries = select_window(&records, &all, 0, 20);

        let per_period = slot_domains(DomainScope::Period, &entries, &records);
        assert_eq!(per_period[0], domain(2.0, 10.0));
        assert_eq!(per_period[1], domain(50.0, 100.0));
        assert_eq!(per_period[2], None);

        let window = slot_domains(DomainScope::Window, &entries, &records);
        assert!(window.iter().all(|slot| *slot == domain(2.0, 100.0)));
    }

    #[test]
    fn dataset_scope_spans_periods_outside_the_window() {
        let records = vec![
            test_record(1, "Jan", 10.0, 0.0),
            test_record(1, "Feb", 4.0, 0.0),
            test_record(1, "Mar", 6.0, 0.0),
            test_record(1, "Apr", 400.0, 0.0),
        ];
        let all = periods(&records);
        let entries = select_window(&records, &all, 0, 20);

        let dataset = slot_domains(DomainScope::Dataset, &entries, &records);
        assert_eq!(dataset.len(), WINDOW_SPAN);
        assert!(dataset.iter().all(|slot| *slot == domain(4.0, 400.0)));
    }

    #[test]
    fn all_zero_period_never_outsizes_a_real_one() {
        let records = vec![
            test_record(1, "Jan", 0.0, 0.0),
            test_record(2, "Jan", 0.0, 0.0),
            test_record(1, "Feb", 5.0, 0.0),
            test_record(2, "Feb", 1.0, 0.0),
        ];
        let all = periods(&records);
        let entries = select_window(&records, &all, 0, 20);
        let settings = ScaleSettings::default();
        let scales = ChartScales::build(&settings, &entries, &records, 960.0, 640.0);

        let radius = |slot: usize, frequency: f64| {
            scales.slots[slot].radius.radius(frequency)
        };
        assert_eq!(radius(0, 0.0), settings.min_radius);
        assert!(radius(0, 0.0) < radius(1, 1.0));
        assert!(radius(0, 0.0) < radius(1, 5.0));
    }
}
