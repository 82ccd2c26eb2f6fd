use lorebook::filter::{self, DimensionChoice, FilterState};
use lorebook::{Catalog, CatalogError, EntitySchema, Entry, Record, RecordStore};
use proptest::prelude::*;
use std::collections::HashSet;

const CATEGORIES: [&str; 3] = ["Weapon", "Armor", "Relic"];

fn schema() -> EntitySchema {
    EntitySchema::from_json5_str(
        r#"{
  kind: "equipment",
  fields: [
    { key: "category", kind: "choice", options: ["Weapon", "Armor", "Relic"], required: true },
  ],
  filters: ["category"],
}"#,
    )
    .unwrap()
}

fn search() -> Vec<String> {
    vec!["name".to_string(), "description".to_string()]
}

fn entries(specs: &[(String, usize)]) -> Vec<Entry> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (name, cat))| {
            Entry::new("equipment", 1, name)
                .with_id(i as u64 + 1)
                .with_attr("category", CATEGORIES[*cat])
        })
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Delete(usize),
    Rename(usize, String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(Op::Create),
        (0usize..16).prop_map(Op::Delete),
        (0usize..16, "[a-z]{1,8}").prop_map(|(i, n)| Op::Rename(i, n)),
    ]
}

proptest! {
    #[test]
    fn filtering_is_idempotent(
        specs in prop::collection::vec(("[A-Za-z ]{0,10}", 0usize..3), 0..24),
        query in "[A-Za-z]{0,3}",
        dim in prop::option::of(0usize..3),
    ) {
        let records = entries(&specs);
        let mut state = FilterState::default();
        state.set_query(&query);
        if let Some(d) = dim {
            state.set_dimension("category", DimensionChoice::Exactly(CATEGORIES[d].to_string()));
        }
        let snapshot = state.clone();

        let once: Vec<u64> = filter::apply(&records, &state, &search()).iter().map(|r| r.id()).collect();
        let twice: Vec<u64> = filter::apply(&records, &state, &search()).iter().map(|r| r.id()).collect();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(state, snapshot);

        // The visible subset keeps store order.
        let mut sorted = once.clone();
        sorted.sort_unstable();
        prop_assert_eq!(once, sorted);
    }

    #[test]
    fn search_ignores_case(
        specs in prop::collection::vec(("[A-Za-z]{0,10}", 0usize..3), 0..24),
        query in "[A-Za-z]{1,4}",
    ) {
        let mut records = entries(&specs);
        records.push(Entry::new("equipment", 1, "Abcdef").with_id(1000));

        let mut upper = FilterState::default();
        upper.set_query(&query.to_uppercase());
        let mut lower = FilterState::default();
        lower.set_query(&query.to_lowercase());

        let a: Vec<u64> = filter::apply(&records, &upper, &search()).iter().map(|r| r.id()).collect();
        let b: Vec<u64> = filter::apply(&records, &lower, &search()).iter().map(|r| r.id()).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn commits_never_duplicate_or_reuse_live_ids(ops in prop::collection::vec(op(), 1..40)) {
        let mut catalog: Catalog<Entry> = Catalog::new(schema());
        for op in ops {
            match op {
                Op::Create(name) => {
                    catalog.start_new_entry(1);
                    catalog.set_field("name", name);
                    catalog.set_field("category", "Weapon");
                    let created = catalog.save().unwrap().record().id();
                    prop_assert_eq!(catalog.store().all().iter().filter(|r| r.id() == created).count(), 1);
                }
                Op::Delete(i) => {
                    let Some(id) = catalog.store().all().get(i).map(Record::id) else { continue };
                    catalog.delete(id).unwrap();
                }
                Op::Rename(i, name) => {
                    let Some(id) = catalog.store().all().get(i).map(Record::id) else { continue };
                    catalog.select(id).unwrap();
                    catalog.set_field("name", name);
                    catalog.save().unwrap();
                }
            }

            let ids: Vec<u64> = catalog.store().all().iter().map(Record::id).collect();
            let unique: HashSet<u64> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());
            prop_assert!(!ids.contains(&0));
            prop_assert!(!catalog.store().contains(catalog.store().next_id().unwrap()));
        }
    }

    #[test]
    fn next_id_is_past_every_live_id(
        ids in prop::collection::hash_set(1u64..500, 0..20),
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let mut store = RecordStore::new();
        for id in &ids {
            store.add(Entry::new("map", 1, "m").with_id(*id)).unwrap();
        }
        for idx in removals {
            if store.is_empty() {
                break;
            }
            let id = store.all()[idx.index(store.len())].id();
            store.remove(id).unwrap();
        }
        let next = store.next_id().unwrap();
        prop_assert!(store.all().iter().all(|r| r.id() < next));
        prop_assert!(!store.contains(next));
    }

    #[test]
    fn missing_required_field_never_mutates_the_store(
        existing in prop::collection::vec(("[a-z]{1,6}", 0usize..3), 0..8),
        name in "[ ]{0,3}|[a-z]{1,6}",
        category_missing in any::<bool>(),
    ) {
        prop_assume!(name.trim().is_empty() || category_missing);

        let mut catalog: Catalog<Entry> = Catalog::new(schema());
        catalog.seed(entries(&existing)).unwrap();
        let before = catalog.store().all().to_vec();

        catalog.start_new_entry(1);
        catalog.set_field("name", name);
        if !category_missing {
            catalog.set_field("category", "Armor");
        }
        let result = catalog.save();
        prop_assert!(matches!(result, Err(CatalogError::Validation(_))));
        prop_assert_eq!(catalog.store().all(), before.as_slice());
    }
}
