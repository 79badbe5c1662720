//! Structural state updates
//!
//! `update` functions return a fresh state instead of mutating the current one.
//! [`produce`] lets such a function be written as an in-place edit on a copy.

/// Turn an in-place `recipe` into a function from the current state to the next.
///
/// The current state is cloned and the recipe applied to the clone; the input
/// is never touched.
///
/// ```
/// use uirs_app::produce;
///
/// let bump = produce(|n: &mut i32| *n += 1);
/// let current = 1;
/// assert_eq!(bump(&current), 2);
/// assert_eq!(current, 1);
/// ```
pub fn produce<S, F>(recipe: F) -> impl Fn(&S) -> S
where
    S: Clone,
    F: Fn(&mut S),
{
    move |state: &S| {
        let mut next = state.clone();
        recipe(&mut next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Todo {
        items: Vec<String>,
        done: usize,
    }

    #[test]
    fn test_produce_leaves_input_untouched() {
        let add = produce(|todo: &mut Todo| todo.items.push("write tests".into()));
        let before = Todo {
            items: vec!["read".into()],
            done: 0,
        };

        let after = add(&before);

        assert_eq!(before.items.len(), 1);
        assert_eq!(after.items, vec!["read".to_string(), "write tests".to_string()]);
    }

    #[test]
    fn test_produce_is_reusable() {
        let complete = produce(|todo: &mut Todo| todo.done += 1);
        let state = Todo {
            items: vec![],
            done: 0,
        };
        let state = complete(&complete(&state));
        assert_eq!(state.done, 2);
    }
}
