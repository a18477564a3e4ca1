use crate::{
    error::{fmt::ParseError as PE, Error},
    fmt::{Element, Value},
};

/// The raw values read by a parser, before a typed value is constructed
/// from them.
///
/// Values are kept in the order they were parsed. Putting a value for an
/// element that already has a *different* value is rejected, since the
/// input would be ambivalent.
///
/// # Example
///
/// ```
/// use chronofmt::{
///     civil::Date,
///     fmt::{Element, Formatter, PatternType},
///     Locale,
/// };
///
/// let f = Formatter::<Date>::of_pattern(
///     "yyyy-MM-dd",
///     PatternType::Cldr,
///     Locale::US,
/// )?;
/// let (raw, _) = f.parse_raw("2024-07-09", 0)?;
/// assert_eq!(raw.get_int(Element::Month), Some(7));
/// assert_eq!(
///     raw.to_string(),
///     "{YEAR=2024, MONTH_OF_YEAR=7, DAY_OF_MONTH=9}",
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedValues {
    entries: Vec<(Element, Value)>,
    /// The nanoseconds of an exactly parsed second fraction.
    fraction: Option<i32>,
}

impl ParsedValues {
    /// Creates an empty set of parsed values.
    pub fn new() -> ParsedValues {
        ParsedValues::default()
    }

    /// Puts a value for an element.
    ///
    /// # Errors
    ///
    /// This returns a parse error when the element already has a different
    /// value.
    pub fn put(
        &mut self,
        element: Element,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        let value = value.into();
        match self.entries.iter().find(|(e, _)| *e == element) {
            Some((_, old)) if *old == value => Ok(()),
            Some((_, old)) => Err(Error::from(PE::Ambivalent {
                element,
                old: old.clone(),
                new: value,
            })),
            None => {
                self.entries.push((element, value));
                Ok(())
            }
        }
    }

    /// Sets the value of an element, replacing any previous value.
    pub fn set(&mut self, element: Element, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(e, _)| *e == element) {
            Some((_, old)) => *old = value,
            None => self.entries.push((element, value)),
        }
    }

    /// Removes the value of an element and returns it.
    pub fn remove(&mut self, element: Element) -> Option<Value> {
        let i = self.entries.iter().position(|(e, _)| *e == element)?;
        Some(self.entries.remove(i).1)
    }

    /// Returns the value of an element.
    pub fn get(&self, element: Element) -> Option<&Value> {
        self.entries.iter().find(|(e, _)| *e == element).map(|(_, v)| v)
    }

    /// Returns the integer value of an element.
    pub fn get_int(&self, element: Element) -> Option<i64> {
        self.get(element).and_then(Value::as_int)
    }

    /// Returns true if the element has a value.
    pub fn contains(&self, element: Element) -> bool {
        self.get(element).is_some()
    }

    /// Returns the number of elements with a value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no element has a value.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over all elements and their values, in the order
    /// they were parsed.
    pub fn iter(&self) -> impl Iterator<Item = (Element, &Value)> {
        self.entries.iter().map(|(e, v)| (*e, v))
    }

    /// Moves all values of `other` into this set.
    ///
    /// # Errors
    ///
    /// This returns a parse error when an element of `other` has a value
    /// that differs from the one in this set.
    pub fn merge(&mut self, other: ParsedValues) -> Result<(), Error> {
        for (element, value) in other.entries {
            self.put(element, value)?;
        }
        if other.fraction.is_some() {
            self.fraction = other.fraction;
        }
        Ok(())
    }

    /// Returns the nanoseconds of an exactly parsed second fraction.
    pub fn fraction(&self) -> Option<i32> {
        self.fraction
    }

    pub(crate) fn set_fraction(&mut self, nanos: i32) {
        self.fraction = Some(nanos);
    }
}

impl core::fmt::Display for ParsedValues {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("{")?;
        for (i, (element, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}={value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambivalent() {
        let mut values = ParsedValues::new();
        values.put(Element::Year, 2024).unwrap();
        values.put(Element::Year, 2024).unwrap();
        insta::assert_snapshot!(
            values.put(Element::Year, 2025).unwrap_err(),
            @"ambivalent value for element YEAR: parsed 2025 but already found 2024",
        );
        values.set(Element::Year, 2025);
        assert_eq!(values.get_int(Element::Year), Some(2025));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn merge_keeps_order() {
        let mut parent = ParsedValues::new();
        parent.put(Element::Year, 1712).unwrap();
        let mut child = ParsedValues::new();
        child.put(Element::Month, 2).unwrap();
        child.put(Element::Year, 1712).unwrap();
        child.set_fraction(5);
        parent.merge(child).unwrap();
        insta::assert_snapshot!(parent, @"{YEAR=1712, MONTH_OF_YEAR=2}");
        assert_eq!(parent.fraction(), Some(5));

        let mut conflict = ParsedValues::new();
        conflict.put(Element::Month, 3).unwrap();
        assert!(parent.merge(conflict).unwrap_err().is_parse());
    }

    #[test]
    fn remove() {
        let mut values = ParsedValues::new();
        values.put(Element::Minute, 5).unwrap();
        assert_eq!(values.remove(Element::Minute), Some(Value::Int(5)));
        assert!(values.is_empty());
        assert_eq!(values.remove(Element::Minute), None);
    }
}
