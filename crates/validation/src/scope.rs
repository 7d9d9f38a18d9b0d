/// Scope is a stack-based mechanism for tracking the location within a
/// policy tree which is currently being validated.
#[derive(Copy, Clone)]
pub struct Scope<'a> {
    /// Parent of this Scope, or None if this is the root.
    parent: Option<&'a Scope<'a>>,
    token: Token<'a>,
}

#[derive(Copy, Clone)]
enum Token<'a> {
    Root,
    Prop(&'a str),
    Item(usize),
}

impl<'a> Scope<'a> {
    /// Create a new scope rooted at the top of the policy tree.
    pub fn root() -> Scope<'static> {
        Scope {
            parent: None,
            token: Token::Root,
        }
    }
    /// Push a property onto the current Scope, returning a new Scope.
    pub fn push_prop(&'a self, name: &'a str) -> Scope<'a> {
        Scope {
            parent: Some(self),
            token: Token::Prop(name),
        }
    }
    /// Push an item index onto the current Scope, returning a new Scope.
    pub fn push_item(&'a self, index: usize) -> Scope<'a> {
        Scope {
            parent: Some(self),
            token: Token::Item(index),
        }
    }

    /// Flatten the scope into a URL fragment-encoded JSON pointer.
    pub fn flatten(self) -> String {
        let mut out = String::from("#");
        self.write_pointer(&mut out);
        out
    }

    fn write_pointer(self, out: &mut String) {
        if let Some(parent) = self.parent {
            parent.write_pointer(out);
        }
        match self.token {
            Token::Root => (),
            Token::Prop(name) => {
                out.push('/');
                out.push_str(&name.replace('~', "~0").replace('/', "~1"));
            }
            Token::Item(index) => {
                out.push('/');
                out.push_str(&index.to_string());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::Scope;

    #[test]
    fn test_scope_pointers() {
        let s1 = Scope::root();
        let s2 = s1.push_prop("routes");
        let s3 = s2.push_item(3);
        let s4 = s3.push_prop("a/b~c");

        assert_eq!(s1.flatten(), "#");
        assert_eq!(s3.flatten(), "#/routes/3");
        assert_eq!(s4.flatten(), "#/routes/3/a~1b~0c");
    }
}
