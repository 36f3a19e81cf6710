//! Extraction of class names from descriptors and generic signatures
//!
//! Accepts anything matching the JVM signature grammar, which is a superset
//! of field and method descriptors. Strings that do not parse completely
//! yield no names, so arbitrary UTF-8 constants can be fed in safely.

/// Return the internal names (`java/util/List`) mentioned by a descriptor or
/// signature, or an empty vector if `text` is neither.
pub fn referenced_type_names(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b'L') | Some(b'[') | Some(b'(') | Some(b'<') => {}
        _ => return Vec::new(),
    }

    let mut scanner = Scanner {
        text,
        bytes,
        pos: 0,
        names: Vec::new(),
    };

    if scanner.signature().is_some() && scanner.pos == bytes.len() {
        scanner.names
    } else {
        Vec::new()
    }
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    names: Vec<String>,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, expected: u8) -> Option<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    /// Class signature, method signature, or a single field type
    fn signature(&mut self) -> Option<()> {
        if self.peek() == Some(b'<') {
            self.type_parameters()?;
        }

        match self.peek()? {
            b'(' => self.method_tail(),
            _ => {
                // Class signatures list a superclass then interfaces
                self.field_type()?;
                while self.pos < self.bytes.len() {
                    self.class_type()?;
                }
                Some(())
            }
        }
    }

    fn method_tail(&mut self) -> Option<()> {
        self.eat(b'(')?;
        while self.peek()? != b')' {
            self.java_type()?;
        }
        self.eat(b')')?;

        if self.peek()? == b'V' {
            self.pos += 1;
        } else {
            self.java_type()?;
        }

        while self.peek() == Some(b'^') {
            self.pos += 1;
            self.field_type()?;
        }
        Some(())
    }

    fn type_parameters(&mut self) -> Option<()> {
        self.eat(b'<')?;
        loop {
            let start = self.pos;
            while !matches!(self.peek()?, b':' | b';' | b'<' | b'>' | b'.' | b'/' | b'[') {
                self.pos += 1;
            }
            if self.pos == start {
                return None;
            }
            // Class bound may be empty, interface bounds follow
            self.eat(b':')?;
            if !matches!(self.peek()?, b':' | b'>') {
                self.field_type()?;
            }
            while self.peek() == Some(b':') {
                self.pos += 1;
                self.field_type()?;
            }
            if self.peek()? == b'>' {
                self.pos += 1;
                return Some(());
            }
        }
    }

    fn java_type(&mut self) -> Option<()> {
        match self.peek()? {
            b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' => {
                self.pos += 1;
                Some(())
            }
            _ => self.field_type(),
        }
    }

    /// Reference type: class, type variable, or array
    fn field_type(&mut self) -> Option<()> {
        match self.peek()? {
            b'L' => self.class_type(),
            b'T' => {
                self.pos += 1;
                self.identifier(b";")?;
                self.eat(b';')
            }
            b'[' => {
                self.pos += 1;
                self.java_type()
            }
            _ => None,
        }
    }

    fn class_type(&mut self) -> Option<()> {
        self.eat(b'L')?;
        let mut name = self.identifier(b";<.")?.to_string();
        self.maybe_type_arguments()?;

        while self.peek()? == b'.' {
            self.pos += 1;
            // Push the enclosing class, then continue with the nested one
            self.names.push(name.clone());
            let inner = self.identifier(b";<.")?;
            name = format!("{}${}", name, inner);
            self.maybe_type_arguments()?;
        }

        self.eat(b';')?;
        self.names.push(name);
        Some(())
    }

    fn maybe_type_arguments(&mut self) -> Option<()> {
        if self.peek() != Some(b'<') {
            return Some(());
        }
        self.pos += 1;
        while self.peek()? != b'>' {
            match self.peek()? {
                b'*' => self.pos += 1,
                b'+' | b'-' => {
                    self.pos += 1;
                    self.field_type()?;
                }
                _ => self.field_type()?,
            }
        }
        self.pos += 1;
        Some(())
    }

    /// Read up to (not including) one of `stops`; reject separators that may
    /// never appear in a name
    fn identifier(&mut self, stops: &[u8]) -> Option<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if stops.contains(&b) {
                break;
            }
            if matches!(b, b'[' | b'>' | b':' | b'(' | b')' | b'<' | b';' | b'.')
                || b.is_ascii_whitespace()
            {
                return None;
            }
            self.pos += 1;
        }
        if self.pos == start || self.peek().is_none() {
            return None;
        }
        Some(&self.text[start..self.pos])
    }
}
