use tcia_dash::aggregate::{
    BUBBLE_SCALE, RADAR_FLOOR, bubble_plot, modality_counts, radar_counts, year_counts,
};
use tcia_dash::domain::{CollectionId, SeriesBatch, SeriesRecord};

fn record(modality: &str, date: Option<&str>) -> SeriesRecord {
    SeriesRecord {
        modality: modality.to_string(),
        series_date: date.map(str::to_string),
    }
}

fn batch(rows: &[(&str, &[SeriesRecord])]) -> SeriesBatch {
    rows.iter()
        .map(|(collection, records)| {
            let id: CollectionId = collection.parse().unwrap();
            (id, records.to_vec())
        })
        .collect()
}

#[test]
fn modality_counts_sum_to_record_count() {
    let input = batch(&[
        (
            "TCGA-A",
            &[
                record("CT", Some("2010-01-01")),
                record("CT", None),
                record("MR", Some("2012-05-05")),
            ][..],
        ),
        ("TCGA-B", &[record("PT", None)][..]),
    ]);

    let counts = modality_counts(&input);
    for (row, (_, records)) in counts.rows.iter().zip(&input) {
        let total: u64 = row.values.iter().sum();
        assert_eq!(total, records.len() as u64);
    }
}

#[test]
fn modality_axis_is_union_in_first_appearance_order() {
    let input = batch(&[
        ("TCGA-A", &[record("MR", None), record("CT", None)][..]),
        ("TCGA-B", &[record("CT", None), record("PT", None)][..]),
    ]);

    let counts = modality_counts(&input);
    assert_eq!(counts.modalities, vec!["MR", "CT", "PT"]);
    assert_eq!(counts.rows[0].values, vec![1, 1, 0]);
    assert_eq!(counts.rows[1].values, vec![0, 1, 1]);
}

#[test]
fn year_counts_skip_dateless_and_sort_years() {
    let input = batch(&[(
        "TCGA-A",
        &[
            record("CT", Some("2012-01-01")),
            record("CT", Some("2010-03-03")),
            record("CT", None),
            record("CT", Some("201")),
            record("CT", Some("２０１０")),
        ][..],
    )]);

    let counts = year_counts(&input, None);
    assert_eq!(counts.years, vec!["2010", "2012"]);
    assert_eq!(counts.rows[0].values, vec![1, 1]);
}

#[test]
fn year_counts_honor_the_modality_filter() {
    let input = batch(&[(
        "TCGA-A",
        &[
            record("CT", Some("2010-01-01")),
            record("MR", Some("2010-02-02")),
            record("MR", Some("2011-02-02")),
        ][..],
    )]);

    let unfiltered = year_counts(&input, None);
    assert_eq!(unfiltered.rows[0].values, vec![2, 1]);

    let filtered = year_counts(&input, Some("MR"));
    assert_eq!(filtered.years, vec!["2010", "2011"]);
    assert_eq!(filtered.rows[0].values, vec![1, 1]);
}

#[test]
fn radar_values_are_never_zero() {
    let input = batch(&[
        ("TCGA-A", &[record("CT", None)][..]),
        ("TCGA-B", &[record("MR", None)][..]),
    ]);

    let counts = radar_counts(&input);
    for row in &counts.rows {
        for value in &row.values {
            assert!(*value > 0.0);
        }
    }
    // axes where a collection has no records sit at the floor
    assert_eq!(counts.rows[0].values[1], RADAR_FLOOR);
    assert_eq!(counts.rows[1].values[0], RADAR_FLOOR);
    assert_eq!(counts.max_count, 1);
}

#[test]
fn bubble_excludes_unknown_modality_and_dateless_records() {
    let input = batch(&[(
        "TCGA-A",
        &[
            record("CT", Some("2010-01-01")),
            record("Unknown", Some("2010-01-01")),
            record("CT", None),
        ][..],
    )]);

    let plot = bubble_plot(&input);
    assert_eq!(plot.max_count, 1);
    assert_eq!(plot.rows.len(), 1);
    assert_eq!(plot.rows[0].points.len(), 1);
    assert_eq!(plot.modalities, vec!["CT"]);
}

#[test]
fn bubble_largest_point_gets_the_full_radius() {
    let input = batch(&[(
        "TCGA-A",
        &[
            record("CT", Some("2010-01-01")),
            record("CT", Some("2010-02-02")),
            record("CT", Some("2010-03-03")),
            record("CT", Some("2010-04-04")),
            record("MR", Some("2011-01-01")),
        ][..],
    )]);

    let plot = bubble_plot(&input);
    assert_eq!(plot.max_count, 4);
    let points = &plot.rows[0].points;
    let ct = points.iter().find(|p| p.count == 4).unwrap();
    let mr = points.iter().find(|p| p.count == 1).unwrap();
    assert_eq!(ct.radius, BUBBLE_SCALE);
    assert!(mr.radius < ct.radius);
    assert_eq!(mr.radius, (1.0f64 / 4.0).sqrt() * BUBBLE_SCALE);
}

#[test]
fn bubble_with_no_qualifying_records_is_empty() {
    let input = batch(&[(
        "TCGA-A",
        &[record("Unknown", Some("2010-01-01")), record("CT", None)][..],
    )]);

    let plot = bubble_plot(&input);
    assert_eq!(plot.max_count, 0);
    assert!(plot.rows.is_empty());
}

#[test]
fn bubble_indices_refer_to_sorted_year_axis() {
    let input = batch(&[(
        "TCGA-A",
        &[
            record("CT", Some("2015-01-01")),
            record("MR", Some("2011-01-01")),
        ][..],
    )]);

    let plot = bubble_plot(&input);
    assert_eq!(plot.years, vec!["2011", "2015"]);
    let points = &plot.rows[0].points;
    let ct = points.iter().find(|p| p.count == 1 && p.modality_index == 0);
    assert!(ct.is_some_and(|p| p.year_index == 1));
}
