use std::fmt;

#[macro_export]
macro_rules! xml_format_args {
    // ends a tag
    (@inner(> $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@outer($($attrs)*) -> ($($pattern),*, ">"), ($($args),*))
    };
    // ends a self-closing element
    (@inner(/> $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@outer($($attrs)*) -> ($($pattern),*, " />"), ($($args),*))
    };
    // matches an attribute with a singly-hyphenated name
    (@inner($aname1:ident-$aname2:ident $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@attr($($attrs)*) -> ($($pattern),*, " ", stringify!($aname1), "-", stringify!($aname2)), ($($args),*))
    };
    // matches an attribute which fits in a rust identifier
    (@inner($aname:ident $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@attr($($attrs)*) -> ($($pattern),*, " ", stringify!($aname)), ($($args),*))
    };

    // an iterable joined with a separator, eg. the points of a polyline
    (@attr(=[$avalue:expr; $join:literal] $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@inner($($attrs)*) -> ($($pattern),*, "=\"{}\""), ($($args,)* $crate::draw::xml::JoinList { list: $avalue, join: $join }))
    };
    // an expression as an attribute value, escaped
    (@attr(={$avalue:expr} $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@inner($($attrs)*) -> ($($pattern),*, "=\"{}\""), ($($args,)* $crate::draw::xml::Escaped($avalue)))
    };
    // a literal as an attribute value
    (@attr(=$avalue:literal $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@inner($($attrs)*) -> ($($pattern),*, "=\"", $avalue, "\""), ($($args),*))
    };

    // starts a tag
    (@outer(<$name:ident $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@inner($($attrs)*) -> ($($pattern),*, "<", stringify!($name)), ($($args),*))
    };
    // matches an end tag
    (@outer(</$name:ident> $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@outer($($attrs)*) -> ($($pattern),*, "</", stringify!($name), ">"), ($($args),*))
    };
    // matches a text expression, escaped
    (@outer({$text:expr} $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@outer($($attrs)*) -> ($($pattern),*, "{}"), ($($args,)* $crate::draw::xml::Escaped($text)))
    };
    // matches a text literal
    (@outer($text:literal $($attrs:tt)*) -> ($($pattern:expr),*), ($($args:expr),*)) => {
        $crate::xml_format_args!(@outer($($attrs)*) -> ($($pattern),*, $text), ($($args),*))
    };
    // matches the end of the xml
    (@outer() -> ($($pattern:expr),*), ($($args:expr),*)) => {
        format_args!(concat!($($pattern),*, "\n"), $($args),*)
    };

    // matches the start of a tag, for opening the xml
    (<$($attrs:tt)*) => {
        $crate::xml_format_args!(@outer(<$($attrs)*) -> (""), ())
    };
}

/// Write XML to an `std::fmt::Write`
#[macro_export]
macro_rules! write_xml {
    ($dst:expr, $($attrs:tt)*) => {
        std::fmt::Write::write_fmt(&mut *$dst, $crate::xml_format_args!($($attrs)*))
    }
}

/// Format xml as a `String`
#[macro_export]
macro_rules! format_xml {
    ($($attrs:tt)*) => {{
        let mut s = String::new();
        // writing to a String doesn't fail
        let _ = $crate::write_xml!(&mut s, $($attrs)*);
        s
    }}
}

pub struct JoinList<D, I>
where
    D: fmt::Display,
    I: IntoIterator<Item = D> + Copy,
{
    pub list: I,
    pub join: &'static str,
}

impl<D, I> fmt::Display for JoinList<D, I>
where
    D: fmt::Display,
    I: IntoIterator<Item = D> + Copy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.list.into_iter();
        if let Some(i) = iter.next() {
            i.fmt(f)?;
        }
        for i in iter {
            f.write_str(self.join)?;
            i.fmt(f)?;
        }
        Ok(())
    }
}

/// Displays the inner value with `&`, `<`, `>` and `"` escaped
pub struct Escaped<D: fmt::Display>(pub D);

impl<D: fmt::Display> fmt::Display for Escaped<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct EscapingWriter<'f, 'a>(&'f mut fmt::Formatter<'a>);

        impl fmt::Write for EscapingWriter<'_, '_> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                let mut rest = s;
                while let Some(at) = rest.find(|c: char| matches!(c, '&' | '<' | '>' | '"')) {
                    self.0.write_str(&rest[..at])?;
                    self.0.write_str(match &rest[at..=at] {
                        "&" => "&amp;",
                        "<" => "&lt;",
                        ">" => "&gt;",
                        _ => "&quot;",
                    })?;
                    rest = &rest[at + 1..];
                }
                self.0.write_str(rest)
            }
        }

        fmt::write(&mut EscapingWriter(f), format_args!("{}", self.0))
    }
}
