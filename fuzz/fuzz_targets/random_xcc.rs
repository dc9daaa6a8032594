#![no_main]

use dancing_xcc::{Constraint, Item, Kind, Solver};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

type Labeled = Constraint<u8, u8>;

/// Items 0 to 5 are primary, items 6 to 9 are secondary with up to two
/// colors.
#[derive(Debug)]
struct RandomXccInput {
    options: Vec<Vec<Labeled>>,
}

impl<'a> arbitrary::Arbitrary<'a> for RandomXccInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let raw = u.arbitrary::<Vec<Vec<(u8, u8)>>>()?;

        let options = raw
            .into_iter()
            .take(16)
            .map(|pairs| {
                let mut items: Vec<Labeled> = Vec::new();
                for (label, color) in pairs.into_iter().take(6) {
                    let label = label % 10;
                    let item = if label < 6 {
                        Constraint::Primary(label)
                    } else {
                        Constraint::Secondary(label, Some(color % 3).filter(|c| *c != 0))
                    };

                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
                items
            })
            .collect();

        Ok(RandomXccInput { options })
    }
}

/// Check that `solution` covers every primary item exactly once and uses
/// every secondary item consistently.
fn is_valid(options: &[Vec<Labeled>], solution: &[usize]) -> bool {
    let mut primary = HashMap::new();
    let mut secondary: HashMap<u8, Vec<Option<u8>>> = HashMap::new();

    for item in solution.iter().flat_map(|index| &options[*index]) {
        match item.kind() {
            Kind::Primary => *primary.entry(*item.label()).or_insert(0) += 1,
            Kind::Secondary(color) => secondary.entry(*item.label()).or_default().push(color),
        }
    }

    let all_primary = options
        .iter()
        .flatten()
        .filter(|item| item.kind().is_primary())
        .all(|item| primary.get(item.label()) == Some(&1));

    let colors_agree = secondary.values().all(|colors| match colors.as_slice() {
        [_] => true,
        [first, rest @ ..] => first.is_some() && rest.iter().all(|color| color == first),
        [] => true,
    });

    all_primary && colors_agree
}

fuzz_target!(|data: RandomXccInput| {
    let provider = |index: &usize| data.options[*index].clone();

    let mut open = Solver::new(provider);
    open.add_options(0..data.options.len()).unwrap();
    let mut sealed = Solver::sealed(provider);
    sealed.add_options(0..data.options.len()).unwrap();

    let solutions = open.all_solutions().unwrap();

    assert_eq!(solutions, sealed.all_solutions().unwrap());
    for solution in &solutions {
        assert!(is_valid(&data.options, solution), "{:?}", solution);
    }
});
