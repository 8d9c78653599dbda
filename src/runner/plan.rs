//! Strided row partitioning across parallel jobs.

use crate::error::{BreakError, Result};

/// Row assignment for one job of a parallel run.
///
/// The assignment is a pure function of `(job_number, total_jobs,
/// total_rows)`: row `r` belongs to the job iff
/// `r % total_jobs == job_number - 1`. Striding, rather than contiguous
/// blocks, spreads genuinely populated rows evenly across jobs when non-data
/// padding is concentrated at the top or bottom of the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPlan {
    pub job_number: usize,
    pub total_jobs: usize,
    pub assigned_rows: Vec<usize>,
}

/// Compute the rows job `job_number` of `total_jobs` must process.
///
/// `job_number` is 1-based and must lie in `[1, total_jobs]`; rows are
/// 0-based. The union over all job numbers for fixed `total_jobs` and
/// `total_rows` is exactly `{0, ..., total_rows - 1}`, each row once.
///
/// # Example
///
/// ```
/// use terrabreak::runner::plan_rows;
///
/// let plan = plan_rows(5, 50, 1000).unwrap();
/// assert_eq!(plan.assigned_rows.len(), 20);
/// assert_eq!(plan.assigned_rows[0], 4);
/// assert_eq!(plan.assigned_rows[19], 954);
/// ```
pub fn plan_rows(job_number: usize, total_jobs: usize, total_rows: usize) -> Result<JobPlan> {
    if total_jobs < 1 || job_number < 1 || job_number > total_jobs {
        return Err(BreakError::InvalidJobSpec {
            job_number,
            total_jobs,
        });
    }

    let assigned_rows = ((job_number - 1)..total_rows).step_by(total_jobs).collect();

    Ok(JobPlan {
        job_number,
        total_jobs,
        assigned_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_matches_documented_sequence() {
        // Job 5 of 50 over 1000 rows: the 0-based rendering of
        // `seq -s , 5 50 1000` (5, 55, ..., 955).
        let plan = plan_rows(5, 50, 1000).unwrap();
        let expected: Vec<usize> = (0..20).map(|k| 4 + 50 * k).collect();
        assert_eq!(plan.assigned_rows, expected);
    }

    #[test]
    fn single_job_owns_every_row() {
        let plan = plan_rows(1, 1, 7).unwrap();
        assert_eq!(plan.assigned_rows, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn zero_rows_is_an_empty_plan() {
        let plan = plan_rows(3, 4, 0).unwrap();
        assert!(plan.assigned_rows.is_empty());
    }

    #[test]
    fn more_jobs_than_rows_leaves_some_jobs_idle() {
        let plan = plan_rows(5, 10, 3).unwrap();
        assert!(plan.assigned_rows.is_empty());

        let plan = plan_rows(2, 10, 3).unwrap();
        assert_eq!(plan.assigned_rows, vec![1]);
    }

    #[test]
    fn out_of_range_specs_rejected() {
        assert!(matches!(
            plan_rows(0, 4, 100),
            Err(BreakError::InvalidJobSpec { .. })
        ));
        assert!(matches!(
            plan_rows(5, 4, 100),
            Err(BreakError::InvalidJobSpec { .. })
        ));
        assert!(matches!(
            plan_rows(1, 0, 100),
            Err(BreakError::InvalidJobSpec { .. })
        ));
    }

    #[test]
    fn plans_partition_the_row_range() {
        let total_jobs = 7;
        let total_rows = 103;
        let mut seen = vec![0usize; total_rows];
        for job in 1..=total_jobs {
            for row in plan_rows(job, total_jobs, total_rows).unwrap().assigned_rows {
                seen[row] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }
}
