use chrono::{Datelike, NaiveDate};
use sales_explorer::{
    Dataset, FilterSelection, Record, Session, YearRange, aggregate, apply_filter,
};

fn rec(product: &str, category: &str, region: &str, qty: f64, price: f64, ymd: (i32, u32, u32)) -> Record {
    Record {
        product: product.into(),
        category: category.into(),
        region: region.into(),
        quantity: qty,
        total_price: Some(price),
        date: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap(),
    }
}

fn three_records() -> Dataset {
    Dataset::new(vec![
        rec("A", "X", "North", 2.0, 100.0, (2023, 1, 1)),
        rec("B", "Y", "South", 1.0, 50.0, (2023, 2, 1)),
        rec("A", "X", "North", 3.0, 150.0, (2024, 1, 1)),
    ])
    .unwrap()
}

fn mixed() -> Dataset {
    let regions = ["North", "South", "East"];
    let categories = ["X", "Y", "Z", "W"];
    let rows = (0..40)
        .map(|i| {
            rec(
                &format!("P{}", i % 7),
                categories[i % 4],
                regions[i % 3],
                (i % 5) as f64,
                10.0 + i as f64,
                (2020 + (i % 4) as i32, 1 + (i % 12) as u32, 1 + (i % 28) as u32),
            )
        })
        .collect();
    Dataset::new(rows).unwrap()
}

#[test]
fn concrete_three_record_scenario() {
    let ds = three_records();
    let sel = FilterSelection::new(["North"], ["X", "Y"], YearRange::new(2023, 2023));
    let filtered = apply_filter(ds.records(), &sel);
    assert_eq!(filtered, vec![ds.records()[0].clone()]);

    let res = aggregate(&filtered);
    assert_eq!(res.total_sales, 100.0);
    assert_eq!(res.total_quantity, 2.0);
    assert_eq!(res.average_price, Some(100.0));
    assert_eq!(res.top_products.len(), 1);
    assert_eq!(res.top_products[0].key, "A");
    assert_eq!(res.top_products[0].total, 100.0);
    assert_eq!(res.sales_by_region.len(), 1);
    assert_eq!(res.sales_by_region[0].key, "North");
    assert_eq!(res.sales_by_region[0].total, 100.0);
    assert_eq!(res.region_category_pivot.rows, ["North"]);
    assert_eq!(res.region_category_pivot.columns, ["X"]);
    assert_eq!(res.region_category_pivot.get("North", "X"), Some(100.0));
}

#[test]
fn disjoint_region_gives_empty_result() {
    let ds = three_records();
    let sel = FilterSelection::new(["West"], ["X", "Y"], YearRange::new(2023, 2024));
    let filtered = apply_filter(ds.records(), &sel);
    assert!(filtered.is_empty());

    let res = aggregate(&filtered);
    assert_eq!(res.total_sales, 0.0);
    assert!(res.top_products.is_empty());
    assert_eq!(res.average_price, None);
    assert!(res.region_category_pivot.is_empty());
}

#[test]
fn total_quantity_matches_manual_predicate() {
    let ds = mixed();
    let selections = [
        FilterSelection::new(["North", "East"], ["X", "Z"], YearRange::new(2021, 2022)),
        FilterSelection::new(["South"], ["W", "Y", "X", "Z"], YearRange::new(2020, 2023)),
        FilterSelection::new(Vec::<String>::new(), ["X"], YearRange::single(2020)),
    ];
    for sel in &selections {
        let expected: f64 = ds
            .records()
            .iter()
            .filter(|r| {
                sel.regions.contains(&r.region)
                    && sel.categories.contains(&r.category)
                    && (sel.years.start..=sel.years.end).contains(&r.date.year())
            })
            .map(|r| r.quantity)
            .sum();
        let res = aggregate(&apply_filter(ds.records(), sel));
        assert_eq!(res.total_quantity, expected);
    }
}

#[test]
fn filtering_is_idempotent() {
    let ds = mixed();
    let sel = FilterSelection::new(["North", "South"], ["Y", "W"], YearRange::new(2020, 2022));
    let once = apply_filter(ds.records(), &sel);
    assert_eq!(apply_filter(&once, &sel), once);
}

#[test]
fn top_products_sorted_and_bounded() {
    let res = aggregate(mixed().records());
    assert!(res.top_products.len() <= 5);
    assert!(
        res.top_products
            .windows(2)
            .all(|w| w[0].total >= w[1].total)
    );
    assert!(
        res.sales_by_category
            .windows(2)
            .all(|w| w[0].total >= w[1].total)
    );
}

#[test]
fn pivot_sums_to_total_sales() {
    let ds = mixed();
    let sel = FilterSelection::new(["North", "East"], ["X", "Y", "W"], YearRange::new(2020, 2023));
    let res = aggregate(&apply_filter(ds.records(), &sel));
    assert!((res.region_category_pivot.total() - res.total_sales).abs() < 1e-9);
    // Only values present after filtering appear in the pivot.
    assert_eq!(res.region_category_pivot.rows, ["East", "North"]);
    assert!(!res.region_category_pivot.columns.contains(&"Z".to_string()));
}

#[test]
fn time_series_is_chronological() {
    let res = aggregate(mixed().records());
    assert!(res.sales_over_time.windows(2).all(|w| w[0].date < w[1].date));
    let sum: f64 = res.sales_over_time.iter().map(|p| p.total).sum();
    assert!((sum - res.total_sales).abs() < 1e-9);
}

#[test]
fn single_year_dataset_filters_to_itself() {
    let ds = Dataset::new(vec![
        rec("A", "X", "North", 1.0, 10.0, (2022, 1, 1)),
        rec("B", "Y", "South", 1.0, 20.0, (2022, 12, 31)),
    ])
    .unwrap();
    let sel = ds.default_selection();
    assert_eq!(sel.years, YearRange::single(2022));
    assert_eq!(apply_filter(ds.records(), &sel), ds.records());

    let session = Session::new(ds);
    assert_eq!(session.aggregate().total_sales, 30.0);
}

#[test]
fn unpriced_sale_still_counts_quantity_and_ranks_at_zero() {
    let mut unpriced = rec("B", "X", "North", 5.0, 0.0, (2023, 1, 2));
    unpriced.total_price = None;
    let ds = Dataset::new(vec![rec("A", "X", "North", 2.0, 100.0, (2023, 1, 1)), unpriced]).unwrap();

    let res = aggregate(&apply_filter(ds.records(), &ds.default_selection()));
    assert_eq!(res.record_count, 2);
    assert_eq!(res.total_quantity, 7.0);
    assert_eq!(res.total_sales, 100.0);
    assert_eq!(res.average_price, Some(100.0));
    let products: Vec<_> = res
        .top_products
        .iter()
        .map(|r| (r.key.as_str(), r.total))
        .collect();
    assert_eq!(products, [("A", 100.0), ("B", 0.0)]);
    assert_eq!(res.sales_over_time.len(), 2);
    assert!((res.region_category_pivot.total() - res.total_sales).abs() < 1e-9);
}

#[test]
fn empty_selection_serializes_positive_zero_sums() {
    let ds = three_records();
    let sel = FilterSelection::new(["West"], ["X"], YearRange::new(2023, 2024));
    let json = serde_json::to_string(&aggregate(&apply_filter(ds.records(), &sel))).unwrap();
    assert!(json.contains(r#""total_sales":0.0"#), "{json}");
    assert!(json.contains(r#""total_quantity":0.0"#), "{json}");
    assert!(json.contains(r#""average_price":null"#), "{json}");
}

#[test]
fn session_recomputes_on_every_change() {
    let mut s = Session::new(three_records());
    assert_eq!(s.aggregate().total_sales, 300.0);
    s.select_regions(["North"]);
    assert_eq!(s.aggregate().total_sales, 250.0);
    s.select_years(YearRange::single(2024));
    assert_eq!(s.aggregate().total_sales, 150.0);
    s.select_categories(["Y"]);
    assert!(s.aggregate().is_empty());
}
