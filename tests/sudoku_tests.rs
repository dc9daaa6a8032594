mod common;

use common::{format_sudoku, init_logging, parse_sudoku, sudoku_placements, sudoku_provider};
use dancing_xcc::Solver;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::{cell::Cell, convert::Infallible};

// Basing these exact counts off of https://en.wikipedia.org/wiki/Mathematics_of_Sudoku#Sudoku_with_rectangular_regions
#[test]
fn enumerate_all_sudoku_solutions_small() {
    let mut solver = Solver::new(sudoku_provider(2));
    solver.add_options(sudoku_placements(2)).unwrap();

    let mut count = 0;
    solver
        .search(|solution| {
            assert_eq!(solution.len(), 16);
            count += 1;
            Ok::<_, Infallible>(())
        })
        .unwrap();

    assert_eq!(count, 288);
}

#[test]
fn enumerate_all_sudoku_solutions_small_sealed() {
    let mut solver = Solver::sealed(sudoku_provider(2));
    solver.add_options(sudoku_placements(2)).unwrap();

    assert_eq!(solver.all_solutions().unwrap().len(), 288);
}

fn solve(sudoku_input: &str, sealed: bool) -> Vec<String> {
    let givens = parse_sudoku(sudoku_input, 3);

    let mut solutions = Vec::new();
    let mut on_solution = |solution: &[&common::Placement]| {
        solutions.push(format_sudoku(solution.iter().copied(), 3));
        Ok::<_, Infallible>(())
    };

    if sealed {
        let mut solver = Solver::sealed(sudoku_provider(3));
        solver.add_options(sudoku_placements(3)).unwrap();
        solver
            .search_with(&mut on_solution, &givens, || false)
            .unwrap();
    } else {
        let mut solver = Solver::new(sudoku_provider(3));
        solver.add_options(sudoku_placements(3)).unwrap();
        solver
            .search_with(&mut on_solution, &givens, || false)
            .unwrap();
    }

    solutions
}

#[test]
fn single_sudoku_test() {
    init_logging();

    let sudoku_input =
        "006008047000607200304009060003100005010020480740005009020930600081000034905006170";
    let expected_solved_sudoku =
        "296318547158647293374259861863194725519723486742865319427931658681572934935486172";

    assert_eq!(solve(sudoku_input, false), vec![expected_solved_sudoku]);
    assert_eq!(solve(sudoku_input, true), vec![expected_solved_sudoku]);
}

#[test]
fn solve_sudoku_batch() {
    init_logging();

    let puzzles = [
        (
            "006008047000607200304009060003100005010020480740005009020930600081000034905006170",
            "296318547158647293374259861863194725519723486742865319427931658681572934935486172",
        ),
        (
            "296318547158647293374259861863194725519723486742865319427931658681572934935486170",
            "296318547158647293374259861863194725519723486742865319427931658681572934935486172",
        ),
    ];

    puzzles
        .into_par_iter()
        .for_each(|(sudoku_input, expected_solved_sudoku)| {
            log::debug!(
                "Attempting to solve [{}] into [{}].",
                sudoku_input,
                expected_solved_sudoku
            );

            assert_eq!(solve(sudoku_input, false), vec![expected_solved_sudoku]);
        });
}

#[test]
#[ignore = "takes too long outside of release mode"]
fn enumerate_many_sudoku_solutions() {
    let mut solver = Solver::new(sudoku_provider(3));
    solver.add_options(sudoku_placements(3)).unwrap();

    let count = Cell::new(0);
    solver
        .search_with(
            |_| {
                count.set(count.get() + 1);
                Ok::<_, Infallible>(())
            },
            &[],
            || count.get() >= 10_000,
        )
        .unwrap();

    assert_eq!(count.get(), 10_000);
}
