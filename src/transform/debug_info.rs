use super::ClassTransformer;
use crate::classfile::Class;
use krakatau2::lib::classfile::attrs::AttrBody;
use krakatau2::lib::parse_utf8;

/// Constructors and static initialisers keep their tables
const INITIALIZERS: [&str; 2] = ["<init>", "<clinit>"];

/// Strips line numbers and local variable tables from declared method bodies
pub struct RemoveDebugInformation;

impl ClassTransformer for RemoveDebugInformation {
    fn name(&self) -> &'static str {
        "remove-debug-information"
    }

    fn apply(&self, class: &mut Class<'_>) -> anyhow::Result<()> {
        let cp = &class.cp;

        for method in &mut class.methods {
            let initializer = cp
                .utf8(method.name)
                .and_then(parse_utf8)
                .is_some_and(|name| INITIALIZERS.iter().any(|init| name == *init));
            if initializer {
                continue;
            }

            for attr in &mut method.attrs {
                let AttrBody::Code((code, _)) = &mut attr.body else {
                    continue;
                };
                code.attrs.retain(|nested| {
                    !matches!(
                        nested.body,
                        AttrBody::LineNumberTable(..)
                            | AttrBody::LocalVariableTable(..)
                            | AttrBody::LocalVariableTypeTable(..)
                    )
                });
            }
        }

        Ok(())
    }
}
