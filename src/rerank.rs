//! Course reranking from the assistant's ranked suggestions

use crate::course::{Course, CourseId};
use std::collections::HashMap;

/// Reorder `courses` so the ones named in `ranked_ids` come first, in ranked order.
///
/// Each ranked id picks the first course with that `Number`; unknown ids are
/// skipped and a course picked once is never picked again. Courses not picked
/// follow in their original relative order. The result is always a
/// permutation of the input.
pub fn rerank(courses: &[Course], ranked_ids: &[CourseId]) -> Vec<Course> {
    if ranked_ids.is_empty() {
        return courses.to_vec();
    }

    let mut first_index: HashMap<&str, usize> = HashMap::with_capacity(courses.len());
    for (idx, course) in courses.iter().enumerate() {
        first_index.entry(course.number.as_str()).or_insert(idx);
    }

    let mut placed = vec![false; courses.len()];
    let mut order = Vec::with_capacity(courses.len());

    for id in ranked_ids {
        match first_index.get(id.as_str()) {
            Some(&idx) if !placed[idx] => {
                placed[idx] = true;
                order.push(idx);
            }
            Some(_) => {}
            None => tracing::debug!(course_id = %id, "Ranked course not in current list"),
        }
    }

    order.extend((0..courses.len()).filter(|idx| !placed[*idx]));
    order.into_iter().map(|idx| courses[idx].clone()).collect()
}
